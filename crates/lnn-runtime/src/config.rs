//! # Runtime Configuration
//!
//! The daemon reads one TOML file. `[network]` and `[monitor]` belong to
//! [`NetworkConfig`]; `[device]` seeds the local node ledger.
//!
//! ```toml
//! [device]
//! name = "living-room-tv"
//! device_type_id = 0x9C
//! # udid and network_id are generated when omitted
//! ```

use lnn_network::{ConfigError, NetworkConfig};
use rand::RngCore;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// `[device]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Human-readable device name.
    pub name: String,
    /// Numeric device type.
    pub device_type_id: u16,
    /// Fixed UDID; random when `None`.
    pub udid: Option<String>,
    /// Fixed network id; random when `None`.
    pub network_id: Option<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "lnn-device".to_string(),
            device_type_id: 0,
            udid: None,
            network_id: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DeviceFile {
    #[serde(default)]
    device: DeviceConfig,
}

/// Everything the daemon needs to start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Interfaces and monitor policy.
    pub network: NetworkConfig,
    /// Local identity.
    pub device: DeviceConfig,
}

impl RuntimeConfig {
    /// Load from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let network = NetworkConfig::parse(content)?;
        let file: DeviceFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self {
            network,
            device: file.device,
        })
    }
}

/// 64 hex characters from the thread RNG.
pub(crate) fn random_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
