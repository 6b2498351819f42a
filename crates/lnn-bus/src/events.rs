//! # LNN Events
//!
//! All events that flow through the bus. Events are transient: nothing is
//! retained once dispatch returns.

use lnn_types::{ConnectionAddrType, NET_IF_NAME_LEN};
use serde::{Deserialize, Serialize};

/// Discriminator used to register handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LnnEventType {
    /// An interface gained, lost or changed an address, or its link flipped.
    IpAddrChanged,
    /// The Wi-Fi service changed state.
    WifiStateChanged,
    /// A peer went online or offline in the mesh.
    NodeOnlineStateChanged,
    /// The connection relation with a peer changed.
    RelationChanged,
    /// The elected master node changed.
    NodeMasterStateChanged,
}

impl LnnEventType {
    /// Stable label for logs and metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IpAddrChanged => "ip_addr_changed",
            Self::WifiStateChanged => "wifi_state_changed",
            Self::NodeOnlineStateChanged => "node_online_state_changed",
            Self::RelationChanged => "relation_changed",
            Self::NodeMasterStateChanged => "node_master_state_changed",
        }
    }
}

/// Wi-Fi service states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiState {
    /// Radio switched on.
    Enabled,
    /// Radio switched off.
    Disabled,
    /// Associated with an access point.
    Connected,
    /// Association lost.
    Disconnected,
}

/// Event payloads, tagged by type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LnnEvent {
    /// Address or link change on an interface.
    IpAddrChanged {
        /// Interface that changed.
        if_name: String,
    },

    /// Wi-Fi service state change.
    WifiStateChanged {
        /// New state.
        state: WifiState,
    },

    /// Peer online-state change.
    NodeOnlineStateChanged {
        /// Peer UDID.
        udid: String,
        /// Whether the peer is now online.
        is_online: bool,
        /// Address type the peer was reached through.
        addr_type: ConnectionAddrType,
        /// Peers still online on `addr_type` after this change.
        online_count: usize,
    },

    /// Peer relation change.
    RelationChanged {
        /// Peer UDID.
        udid: String,
        /// Address type of the affected link.
        addr_type: ConnectionAddrType,
        /// Number of live connections of that type.
        relation: u8,
    },

    /// Master-node election result.
    NodeMasterStateChanged {
        /// UDID of the master.
        master_udid: String,
        /// Election weight of the master.
        weight: i32,
        /// Whether the local node is the master.
        is_master: bool,
    },
}

impl LnnEvent {
    /// Get the discriminator for this event.
    #[must_use]
    pub fn event_type(&self) -> LnnEventType {
        match self {
            Self::IpAddrChanged { .. } => LnnEventType::IpAddrChanged,
            Self::WifiStateChanged { .. } => LnnEventType::WifiStateChanged,
            Self::NodeOnlineStateChanged { .. } => LnnEventType::NodeOnlineStateChanged,
            Self::RelationChanged { .. } => LnnEventType::RelationChanged,
            Self::NodeMasterStateChanged { .. } => LnnEventType::NodeMasterStateChanged,
        }
    }

    /// Check the payload before dispatch.
    pub(crate) fn validate(&self) -> Result<(), String> {
        match self {
            Self::IpAddrChanged { if_name } => {
                if if_name.is_empty() || if_name.len() > NET_IF_NAME_LEN {
                    return Err(format!("bad interface name '{if_name}'"));
                }
                Ok(())
            }
            Self::NodeOnlineStateChanged { udid, .. } | Self::RelationChanged { udid, .. } => {
                if udid.is_empty() {
                    return Err("empty udid".to_string());
                }
                Ok(())
            }
            Self::NodeMasterStateChanged { master_udid, .. } => {
                if master_udid.is_empty() {
                    return Err("empty master udid".to_string());
                }
                Ok(())
            }
            Self::WifiStateChanged { .. } => Ok(()),
        }
    }
}
