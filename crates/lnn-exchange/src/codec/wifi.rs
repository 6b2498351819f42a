//! Wi-Fi (IP) descriptor codec.

use super::{check_code, keys, CommonFields, DescriptorCodec};
use crate::ExchangeError;
use lnn_types::{NodeInfo, ProtocolMask, SoftBusVersion};
use serde::{Deserialize, Serialize};

const WIFI_CODE: i32 = 1;

/// Bus protocol range this node speaks.
const BUS_MIN_VERSION: i32 = 1;
const BUS_MAX_VERSION: i32 = 2;

#[derive(Debug, Serialize, Deserialize)]
struct WifiDescriptor {
    #[serde(rename = "CODE")]
    code: i32,
    #[serde(flatten)]
    common: CommonFields,
    #[serde(rename = "BUS_MAX_VERSION", default, skip_serializing_if = "Option::is_none")]
    bus_max_version: Option<i32>,
    #[serde(rename = "BUS_MIN_VERSION", default, skip_serializing_if = "Option::is_none")]
    bus_min_version: Option<i32>,
    #[serde(rename = "AUTH_PORT", default, skip_serializing_if = "Option::is_none")]
    auth_port: Option<u16>,
    #[serde(rename = "SESSION_PORT", default, skip_serializing_if = "Option::is_none")]
    session_port: Option<u16>,
    #[serde(rename = "PROXY_PORT", default, skip_serializing_if = "Option::is_none")]
    proxy_port: Option<u16>,
}

/// Codec for descriptors exchanged over an IP link.
///
/// Carries the listener ports the peer should connect to. A peer that
/// omits `TRANSPORT_PROTOCOL` is assumed to speak IP only.
#[derive(Debug, Clone, Copy, Default)]
pub struct WifiCodec;

impl DescriptorCodec for WifiCodec {
    fn code(&self) -> i32 {
        WIFI_CODE
    }

    fn pack(&self, info: &NodeInfo, version: SoftBusVersion) -> Result<Vec<u8>, ExchangeError> {
        let descriptor = WifiDescriptor {
            code: WIFI_CODE,
            common: CommonFields::from_info(info, version)?,
            bus_max_version: Some(BUS_MAX_VERSION),
            bus_min_version: Some(BUS_MIN_VERSION),
            auth_port: info.auth_port,
            session_port: info.session_port,
            proxy_port: info.proxy_port,
        };
        Ok(serde_json::to_vec(&descriptor)?)
    }

    fn unpack(&self, json: &[u8], version: SoftBusVersion) -> Result<NodeInfo, ExchangeError> {
        let descriptor: WifiDescriptor = serde_json::from_slice(json)?;
        check_code(WIFI_CODE, descriptor.code)?;

        if let Some(peer_max) = descriptor.bus_max_version {
            if peer_max < BUS_MIN_VERSION {
                return Err(ExchangeError::Parse(format!(
                    "{} {peer_max} below supported minimum {BUS_MIN_VERSION}",
                    keys::BUS_MAX_VERSION
                )));
            }
        }

        let mut info = descriptor
            .common
            .into_info(version, ProtocolMask::WIFI_DEFAULT)?;
        info.auth_port = descriptor.auth_port;
        info.session_port = descriptor.session_port;
        info.proxy_port = descriptor.proxy_port;
        Ok(info)
    }
}
