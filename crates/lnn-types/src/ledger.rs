//! # Node Ledger Port
//!
//! The node ledger stores the local device's attributes. It is owned by an
//! external collaborator; LNN reads it to build descriptors and writes it
//! when the main port or listener ports change.

use crate::errors::LnnError;
use crate::NET_IF_NAME_LEN;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

/// String attributes of the local node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrKey {
    /// Device name.
    DeviceName,
    /// Device UDID.
    DeviceUdid,
    /// Mesh network id.
    NetworkId,
    /// Build type string.
    VersionType,
    /// Bluetooth MAC.
    BtMac,
    /// Address of the main IP interface.
    WlanIp,
    /// Name of the main IP interface.
    NetIfName,
    /// Wi-Fi P2P MAC.
    P2pMac,
    /// Soft-bus software version.
    SoftbusVersion,
    /// UDID of the elected master node.
    MasterNodeUdid,
}

/// Numeric attributes of the local node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumKey {
    /// Numeric device type.
    DeviceTypeId,
    /// Net capability bitmask.
    NetCapability,
    /// Wi-Fi P2P role.
    P2pRole,
    /// Supported transport protocol mask.
    TransportProtocols,
    /// Authentication listener port.
    AuthPort,
    /// Session listener port.
    SessionPort,
    /// Proxy listener port.
    ProxyPort,
    /// Election weight of the master node.
    MasterNodeWeight,
}

/// Contract of the node ledger collaborator.
pub trait NodeLedger: Send + Sync {
    /// Read a string attribute.
    fn get_str(&self, key: StrKey) -> Option<String>;

    /// Write a string attribute.
    fn set_str(&self, key: StrKey, value: &str) -> Result<(), LnnError>;

    /// Read a numeric attribute.
    fn get_num(&self, key: NumKey) -> Option<i64>;

    /// Write a numeric attribute.
    fn set_num(&self, key: NumKey, value: i64) -> Result<(), LnnError>;
}

/// Ledger kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryNodeLedger {
    strings: RwLock<HashMap<StrKey, String>>,
    numbers: RwLock<HashMap<NumKey, i64>>,
}

impl InMemoryNodeLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeLedger for InMemoryNodeLedger {
    fn get_str(&self, key: StrKey) -> Option<String> {
        self.strings.read().get(&key).cloned()
    }

    fn set_str(&self, key: StrKey, value: &str) -> Result<(), LnnError> {
        if key == StrKey::NetIfName && value.len() > NET_IF_NAME_LEN {
            return Err(LnnError::InvalidArgument(format!(
                "interface name '{value}' exceeds {NET_IF_NAME_LEN} bytes"
            )));
        }
        trace!(key = ?key, value, "ledger string updated");
        self.strings.write().insert(key, value.to_string());
        Ok(())
    }

    fn get_num(&self, key: NumKey) -> Option<i64> {
        self.numbers.read().get(&key).copied()
    }

    fn set_num(&self, key: NumKey, value: i64) -> Result<(), LnnError> {
        trace!(key = ?key, value, "ledger number updated");
        self.numbers.write().insert(key, value);
        Ok(())
    }
}
