//! # Node Info
//!
//! The device-descriptor record exchanged during network join.
//!
//! A `NodeInfo` is built fresh for every handshake attempt from the node
//! ledger and is never persisted; callers merge an unpacked peer record back
//! into their own ledger.

use crate::protocol::ProtocolMask;
use serde::{Deserialize, Serialize};

/// Device descriptor negotiated with a peer.
///
/// Fields wrapped in `Option` are only present for some transports or some
/// protocol tiers:
///
/// - `software_version`, `master_udid`, `master_weight`: new tier only
/// - `bt_mac`: Bluetooth exchange only
/// - `auth_port`, `session_port`, `proxy_port`: IP exchange only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Human-readable device name.
    pub device_name: String,
    /// Numeric device type.
    pub device_type_id: u16,
    /// Unique device identifier.
    pub udid: String,
    /// Identifier of the device within the mesh.
    pub network_id: String,
    /// Software build type string.
    pub version_type: String,
    /// Net capability bitmask.
    pub net_capability: u32,
    /// Wi-Fi P2P role.
    pub p2p_role: i32,
    /// Wi-Fi P2P MAC.
    pub p2p_mac: String,
    /// Transport protocols the device supports.
    pub supported_protocols: ProtocolMask,
    /// Soft-bus software version (new tier).
    pub software_version: Option<String>,
    /// UDID of the elected master node (new tier).
    pub master_udid: Option<String>,
    /// Election weight of the master node (new tier).
    pub master_weight: Option<i32>,
    /// Bluetooth MAC (Bluetooth exchange).
    pub bt_mac: Option<String>,
    /// Authentication listener port (IP exchange).
    pub auth_port: Option<u16>,
    /// Session listener port (IP exchange).
    pub session_port: Option<u16>,
    /// Proxy listener port (IP exchange).
    pub proxy_port: Option<u16>,
}

impl NodeInfo {
    /// Drop fields a legacy-tier peer never sends.
    pub fn strip_new_tier_fields(&mut self) {
        self.software_version = None;
        self.master_udid = None;
        self.master_weight = None;
    }
}
