//! # Network Configuration
//!
//! ```toml
//! [network]
//! # "<netif-type-index>:<if-name>" pairs; 0=ETH 1=WLAN 2=BR 3=BLE
//! netif_names = "0:eth0,1:wlan0,2:br0,3:ble0"
//! auto_networking = true
//!
//! [monitor]
//! restart_backoff_ms = 500
//! max_backoff_ms = 30000
//! max_restarts = 0   # 0 = unlimited
//! ```

use crate::domain::{NetifEntry, NetifList};
use lnn_types::{NetifType, NET_IF_NAME_LEN};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Default managed interfaces.
pub const DEFAULT_NETIF_NAMES: &str = "0:eth0,1:wlan0,2:br0,3:ble0";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Malformed `netif_names` entry.
    #[error("Invalid netif entry '{0}'")]
    InvalidNetif(String),
}

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// `[network]` section.
    pub network: NetworkSection,
    /// `[monitor]` section.
    pub monitor: MonitorConfig,
}

/// `[network]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    /// Managed interfaces, see [`parse_netif_names`].
    pub netif_names: String,
    /// Start discovery when an IP subnet comes up.
    pub auto_networking: bool,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            netif_names: DEFAULT_NETIF_NAMES.to_string(),
            auto_networking: true,
        }
    }
}

/// `[monitor]` section: restart policy for interface monitors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// First restart delay.
    pub restart_backoff_ms: u64,
    /// Ceiling for the doubling delay.
    pub max_backoff_ms: u64,
    /// Give up after this many restarts; 0 never gives up.
    pub max_restarts: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            restart_backoff_ms: 500,
            max_backoff_ms: 30_000,
            max_restarts: 0,
        }
    }
}

impl MonitorConfig {
    /// Delay before restart number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(20);
        let delay = self
            .restart_backoff_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay)
    }

    /// Whether restart number `attempt` is still allowed.
    pub fn allows_restart(&self, attempt: u32) -> bool {
        self.max_restarts == 0 || attempt <= self.max_restarts
    }
}

impl NetworkConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// The netif list is validated here so a bad file fails at load time.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        parse_netif_names(&config.network.netif_names)?;
        Ok(config)
    }

    /// Managed interfaces.
    pub fn netifs(&self) -> Result<NetifList, ConfigError> {
        parse_netif_names(&self.network.netif_names).map(NetifList::new)
    }
}

/// Parse `"<type-index>:<if-name>"` pairs separated by commas.
///
/// Later duplicates of a name are ignored with a warning.
pub fn parse_netif_names(names: &str) -> Result<Vec<NetifEntry>, ConfigError> {
    let mut entries: Vec<NetifEntry> = Vec::new();

    for raw in names.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (index, name) = raw
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidNetif(raw.to_string()))?;

        let netif_type = index
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(NetifType::from_index)
            .ok_or_else(|| ConfigError::InvalidNetif(raw.to_string()))?;

        let name = name.trim();
        if name.is_empty() || name.len() > NET_IF_NAME_LEN {
            return Err(ConfigError::InvalidNetif(raw.to_string()));
        }

        if entries.iter().any(|e| e.if_name == name) {
            warn!(if_name = name, "Duplicate netif entry ignored");
            continue;
        }
        entries.push(NetifEntry::new(name, netif_type));
    }

    Ok(entries)
}
