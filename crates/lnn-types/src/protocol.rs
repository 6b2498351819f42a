//! # Transport Protocols
//!
//! Protocol identifiers and the 64-bit protocol-support mask exchanged
//! with peers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport protocol kind. Each kind owns one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolType {
    /// Bluetooth BR/EDR.
    Br,
    /// Bluetooth Low Energy.
    Ble,
    /// IP (Ethernet / WLAN).
    Ip,
    /// File transfer over IP.
    Dfile,
    /// CoAP discovery.
    Coap,
}

impl ProtocolType {
    /// Bit representing this protocol.
    #[must_use]
    pub const fn bit(self) -> u64 {
        match self {
            Self::Br => 1 << 0,
            Self::Ble => 1 << 1,
            Self::Ip => 1 << 2,
            Self::Dfile => 1 << 3,
            Self::Coap => 1 << 4,
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Br => write!(f, "BR"),
            Self::Ble => write!(f, "BLE"),
            Self::Ip => write!(f, "IP"),
            Self::Dfile => write!(f, "DFILE"),
            Self::Coap => write!(f, "COAP"),
        }
    }
}

/// Set of supported transport protocols, as carried on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolMask(u64);

impl ProtocolMask {
    /// Empty mask.
    pub const NONE: Self = Self(0);

    /// Default assumed for a Bluetooth peer that does not report a mask.
    pub const BT_DEFAULT: Self = Self(ProtocolType::Br.bit() | ProtocolType::Ble.bit());

    /// Default assumed for a Wi-Fi peer that does not report a mask.
    pub const WIFI_DEFAULT: Self = Self(ProtocolType::Ip.bit());

    /// Wrap raw bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Add a protocol.
    #[must_use]
    pub const fn with(self, protocol: ProtocolType) -> Self {
        Self(self.0 | protocol.bit())
    }

    /// Whether `protocol` is in the set.
    #[must_use]
    pub const fn contains(self, protocol: ProtocolType) -> bool {
        self.0 & protocol.bit() != 0
    }
}

impl FromIterator<ProtocolType> for ProtocolMask {
    fn from_iter<I: IntoIterator<Item = ProtocolType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}
