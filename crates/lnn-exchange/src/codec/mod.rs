//! # Descriptor Codecs
//!
//! One JSON codec per transport family, selected by link type:
//!
//! | Link | Codec | `CODE` |
//! |------|-------|--------|
//! | `Wifi` | [`WifiCodec`] | 1 |
//! | `Br`, `Ble` | [`BtCodec`] | 5 |
//! | `P2p` | none | |
//!
//! Every codec writes the common block below plus its own fields. The
//! software version and master-election fields are written and read only
//! at [`SoftBusVersion::NewV1`] or later.

mod bt;
mod wifi;

pub use bt::BtCodec;
pub use wifi::WifiCodec;

use crate::ExchangeError;
use lnn_types::{AuthLinkType, NodeInfo, ProtocolMask, SoftBusVersion};
use serde::{Deserialize, Serialize};

/// JSON key names.
pub mod keys {
    /// Codec discriminator.
    pub const CODE: &str = "CODE";
    /// Device name.
    pub const DEVICE_NAME: &str = "DEVICE_NAME";
    /// Numeric device type.
    pub const DEVICE_TYPE: &str = "DEVICE_TYPE";
    /// Device UDID.
    pub const DEVICE_UDID: &str = "DEVICE_UDID";
    /// Mesh network id.
    pub const NETWORK_ID: &str = "NETWORK_ID";
    /// Build type string.
    pub const VERSION_TYPE: &str = "VERSION_TYPE";
    /// Net capability bitmask.
    pub const CONN_CAP: &str = "CONN_CAP";
    /// Wi-Fi P2P role.
    pub const P2P_ROLE: &str = "P2P_ROLE";
    /// Wi-Fi P2P MAC.
    pub const P2P_MAC_ADDR: &str = "P2P_MAC_ADDR";
    /// Supported transport protocol bitmask.
    pub const TRANSPORT_PROTOCOL: &str = "TRANSPORT_PROTOCOL";
    /// Soft-bus software version (new tier).
    pub const SW_VERSION: &str = "SW_VERSION";
    /// Master node UDID (new tier).
    pub const MASTER_UDID: &str = "MASTER_UDID";
    /// Master node weight (new tier).
    pub const MASTER_WEIGHT: &str = "MASTER_WEIGHT";
    /// Bluetooth MAC.
    pub const BT_MAC: &str = "BT_MAC";
    /// Highest bus version spoken.
    pub const BUS_MAX_VERSION: &str = "BUS_MAX_VERSION";
    /// Lowest bus version spoken.
    pub const BUS_MIN_VERSION: &str = "BUS_MIN_VERSION";
    /// Authentication listener port.
    pub const AUTH_PORT: &str = "AUTH_PORT";
    /// Session listener port.
    pub const SESSION_PORT: &str = "SESSION_PORT";
    /// Proxy listener port.
    pub const PROXY_PORT: &str = "PROXY_PORT";
}

/// A transport-specific descriptor format.
pub trait DescriptorCodec: Send + Sync {
    /// Value of the `CODE` field this codec writes and expects.
    fn code(&self) -> i32;

    /// Serialise `info` as UTF-8 JSON for a peer speaking `version`.
    fn pack(&self, info: &NodeInfo, version: SoftBusVersion) -> Result<Vec<u8>, ExchangeError>;

    /// Parse a peer's JSON into a fresh record.
    fn unpack(&self, json: &[u8], version: SoftBusVersion) -> Result<NodeInfo, ExchangeError>;
}

static CODECS: [(AuthLinkType, &dyn DescriptorCodec); 3] = [
    (AuthLinkType::Wifi, &WifiCodec),
    (AuthLinkType::Br, &BtCodec),
    (AuthLinkType::Ble, &BtCodec),
];

/// Codec for descriptors exchanged over `link`.
pub fn codec_for(link: AuthLinkType) -> Result<&'static dyn DescriptorCodec, ExchangeError> {
    CODECS
        .iter()
        .find(|(l, _)| *l == link)
        .map(|(_, codec)| *codec)
        .ok_or(ExchangeError::UnsupportedTransport(link))
}

/// Fields shared by every codec.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CommonFields {
    #[serde(rename = "DEVICE_NAME", default)]
    device_name: String,
    #[serde(rename = "DEVICE_TYPE", default)]
    device_type_id: u16,
    #[serde(rename = "DEVICE_UDID")]
    udid: String,
    #[serde(rename = "NETWORK_ID")]
    network_id: String,
    #[serde(rename = "VERSION_TYPE", default)]
    version_type: String,
    #[serde(rename = "CONN_CAP", default)]
    net_capability: u32,
    #[serde(rename = "P2P_ROLE", default)]
    p2p_role: i32,
    #[serde(rename = "P2P_MAC_ADDR", default)]
    p2p_mac: String,
    #[serde(rename = "TRANSPORT_PROTOCOL", default, skip_serializing_if = "Option::is_none")]
    transport_protocol: Option<u64>,
    #[serde(rename = "SW_VERSION", default, skip_serializing_if = "Option::is_none")]
    software_version: Option<String>,
    #[serde(rename = "MASTER_UDID", default, skip_serializing_if = "Option::is_none")]
    master_udid: Option<String>,
    #[serde(rename = "MASTER_WEIGHT", default, skip_serializing_if = "Option::is_none")]
    master_weight: Option<i32>,
}

impl CommonFields {
    /// Take the common block from `info`, dropping gated fields below the
    /// new tier.
    pub(crate) fn from_info(info: &NodeInfo, version: SoftBusVersion) -> Result<Self, ExchangeError> {
        if info.udid.is_empty() || info.network_id.is_empty() {
            return Err(ExchangeError::InvalidArgument(
                "descriptor needs a udid and a network id".to_string(),
            ));
        }
        let gated = version.is_new_tier();
        Ok(Self {
            device_name: info.device_name.clone(),
            device_type_id: info.device_type_id,
            udid: info.udid.clone(),
            network_id: info.network_id.clone(),
            version_type: info.version_type.clone(),
            net_capability: info.net_capability,
            p2p_role: info.p2p_role,
            p2p_mac: info.p2p_mac.clone(),
            transport_protocol: Some(info.supported_protocols.bits()),
            software_version: info.software_version.clone().filter(|_| gated),
            master_udid: info.master_udid.clone().filter(|_| gated),
            master_weight: info.master_weight.filter(|_| gated),
        })
    }

    /// Build a record from the common block. A missing protocol mask
    /// becomes `default_protocols`.
    pub(crate) fn into_info(
        self,
        version: SoftBusVersion,
        default_protocols: ProtocolMask,
    ) -> Result<NodeInfo, ExchangeError> {
        if self.udid.is_empty() {
            return Err(ExchangeError::Parse(format!("empty {}", keys::DEVICE_UDID)));
        }
        if self.network_id.is_empty() {
            return Err(ExchangeError::Parse(format!("empty {}", keys::NETWORK_ID)));
        }

        let mut info = NodeInfo {
            device_name: self.device_name,
            device_type_id: self.device_type_id,
            udid: self.udid,
            network_id: self.network_id,
            version_type: self.version_type,
            net_capability: self.net_capability,
            p2p_role: self.p2p_role,
            p2p_mac: self.p2p_mac,
            supported_protocols: self
                .transport_protocol
                .map_or(default_protocols, ProtocolMask::from_bits),
            software_version: self.software_version,
            master_udid: self.master_udid,
            master_weight: self.master_weight,
            ..NodeInfo::default()
        };
        if !version.is_new_tier() {
            info.strip_new_tier_fields();
        }
        Ok(info)
    }
}

/// Reject a payload whose `CODE` belongs to another codec.
pub(crate) fn check_code(expected: i32, actual: i32) -> Result<(), ExchangeError> {
    if expected != actual {
        return Err(ExchangeError::Parse(format!(
            "{} {actual} where {expected} was expected",
            keys::CODE
        )));
    }
    Ok(())
}
