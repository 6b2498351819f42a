//! Authentication-session identifiers used to key descriptor encryption.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Negotiation role of the local device in an authentication session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthSide {
    /// Local device initiated the session.
    Client,
    /// Local device accepted the session.
    Server,
}

impl AuthSide {
    /// Role of the peer in the same session.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Client => Self::Server,
            Self::Server => Self::Client,
        }
    }
}

/// Link an authentication session runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthLinkType {
    /// IP link (Ethernet or WLAN).
    Wifi,
    /// Bluetooth BR/EDR.
    Br,
    /// Bluetooth Low Energy.
    Ble,
    /// Wi-Fi P2P group.
    P2p,
}

/// Address used to reach a peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectOption {
    /// Bluetooth BR/EDR MAC address.
    Br {
        /// Peer MAC.
        mac: String,
    },
    /// BLE MAC address.
    Ble {
        /// Peer MAC.
        mac: String,
    },
    /// IP endpoint.
    Wlan {
        /// Peer address.
        ip: IpAddr,
        /// Peer auth port.
        port: u16,
    },
}

impl ConnectOption {
    /// Link type this option connects over.
    #[must_use]
    pub fn link_type(&self) -> AuthLinkType {
        match self {
            Self::Br { .. } => AuthLinkType::Br,
            Self::Ble { .. } => AuthLinkType::Ble,
            Self::Wlan { .. } => AuthLinkType::Wifi,
        }
    }
}
