//! # Network Interfaces
//!
//! Coarse interface kinds and the mesh address types they map onto.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse type of a network interface.
///
/// Each type owns one bit so protocols can advertise the set of interfaces
/// they run on as a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetifType {
    /// Wired Ethernet.
    Eth,
    /// Wireless LAN.
    Wlan,
    /// Bluetooth BR/EDR.
    Br,
    /// Bluetooth Low Energy.
    Ble,
}

/// Every interface type.
pub const NETIF_MASK_ALL: u32 = 0b1111;

/// Interface types that carry IP traffic.
pub const NETIF_MASK_IP: u32 = NetifType::Eth.mask() | NetifType::Wlan.mask();

impl NetifType {
    /// Bit representing this type in a netif mask.
    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Self::Eth => 1 << 0,
            Self::Wlan => 1 << 1,
            Self::Br => 1 << 2,
            Self::Ble => 1 << 3,
        }
    }

    /// Resolve the numeric index used in the `netif_names` configuration
    /// string (`0=ETH 1=WLAN 2=BR 3=BLE`).
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Eth),
            1 => Some(Self::Wlan),
            2 => Some(Self::Br),
            3 => Some(Self::Ble),
            _ => None,
        }
    }

    /// Whether this type is part of `mask`.
    #[must_use]
    pub fn in_mask(self, mask: u32) -> bool {
        mask & self.mask() != 0
    }

    /// Mesh address type for links on this interface.
    #[must_use]
    pub fn addr_type(self) -> ConnectionAddrType {
        match self {
            Self::Eth => ConnectionAddrType::Eth,
            Self::Wlan => ConnectionAddrType::Wlan,
            Self::Br => ConnectionAddrType::Br,
            Self::Ble => ConnectionAddrType::Ble,
        }
    }
}

impl fmt::Display for NetifType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eth => write!(f, "ETH"),
            Self::Wlan => write!(f, "WLAN"),
            Self::Br => write!(f, "BR"),
            Self::Ble => write!(f, "BLE"),
        }
    }
}

/// Address type a mesh member was reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionAddrType {
    /// Reached over WLAN.
    Wlan,
    /// Reached over Bluetooth BR/EDR.
    Br,
    /// Reached over BLE.
    Ble,
    /// Reached over Ethernet.
    Eth,
}

impl ConnectionAddrType {
    /// Address types left when the owning interface cannot be resolved.
    pub const IP_FALLBACK: [ConnectionAddrType; 2] = [Self::Wlan, Self::Eth];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_disjoint() {
        let all = [NetifType::Eth, NetifType::Wlan, NetifType::Br, NetifType::Ble];
        let combined = all.iter().fold(0, |acc, t| {
            assert_eq!(acc & t.mask(), 0);
            acc | t.mask()
        });
        assert_eq!(combined, NETIF_MASK_ALL);
    }

    #[test]
    fn test_ip_mask_covers_eth_and_wlan_only() {
        assert!(NetifType::Eth.in_mask(NETIF_MASK_IP));
        assert!(NetifType::Wlan.in_mask(NETIF_MASK_IP));
        assert!(!NetifType::Br.in_mask(NETIF_MASK_IP));
        assert!(!NetifType::Ble.in_mask(NETIF_MASK_IP));
    }

    #[test]
    fn test_from_index() {
        assert_eq!(NetifType::from_index(1), Some(NetifType::Wlan));
        assert_eq!(NetifType::from_index(4), None);
    }
}
