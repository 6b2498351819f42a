//! Bluetooth (BR/BLE) descriptor codec.

use super::{check_code, CommonFields, DescriptorCodec};
use crate::ExchangeError;
use lnn_types::{NodeInfo, ProtocolMask, SoftBusVersion};
use serde::{Deserialize, Serialize};

const BT_CODE: i32 = 5;

#[derive(Debug, Serialize, Deserialize)]
struct BtDescriptor {
    #[serde(rename = "CODE")]
    code: i32,
    #[serde(flatten)]
    common: CommonFields,
    #[serde(rename = "BT_MAC", default, skip_serializing_if = "Option::is_none")]
    bt_mac: Option<String>,
}

/// Codec for descriptors exchanged over BR or BLE.
///
/// A peer that omits `TRANSPORT_PROTOCOL` is assumed to speak BR and BLE.
#[derive(Debug, Clone, Copy, Default)]
pub struct BtCodec;

impl DescriptorCodec for BtCodec {
    fn code(&self) -> i32 {
        BT_CODE
    }

    fn pack(&self, info: &NodeInfo, version: SoftBusVersion) -> Result<Vec<u8>, ExchangeError> {
        let descriptor = BtDescriptor {
            code: BT_CODE,
            common: CommonFields::from_info(info, version)?,
            bt_mac: info.bt_mac.clone(),
        };
        Ok(serde_json::to_vec(&descriptor)?)
    }

    fn unpack(&self, json: &[u8], version: SoftBusVersion) -> Result<NodeInfo, ExchangeError> {
        let descriptor: BtDescriptor = serde_json::from_slice(json)?;
        check_code(BT_CODE, descriptor.code)?;

        let mut info = descriptor
            .common
            .into_info(version, ProtocolMask::BT_DEFAULT)?;
        info.bt_mac = descriptor.bt_mac;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::keys;
    use lnn_types::ProtocolType;
    use serde_json::Value;

    fn bt_info() -> NodeInfo {
        NodeInfo {
            device_name: "phone".into(),
            device_type_id: 0x0E,
            udid: "udid-bt".into(),
            network_id: "net-bt".into(),
            version_type: "release".into(),
            net_capability: 0b1011,
            p2p_role: 2,
            p2p_mac: "02:00:00:00:00:01".into(),
            supported_protocols: ProtocolMask::BT_DEFAULT.with(ProtocolType::Ip),
            software_version: Some("11.0.0.100".into()),
            master_udid: Some("master".into()),
            master_weight: Some(42),
            bt_mac: Some("aa:bb:cc:dd:ee:ff".into()),
            ..NodeInfo::default()
        }
    }

    fn as_json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_new_tier_includes_gated_fields() {
        let json = as_json(&BtCodec.pack(&bt_info(), SoftBusVersion::NewV1).unwrap());
        assert_eq!(json[keys::CODE], 5);
        assert_eq!(json[keys::SW_VERSION], "11.0.0.100");
        assert_eq!(json[keys::MASTER_UDID], "master");
        assert_eq!(json[keys::MASTER_WEIGHT], 42);
        assert_eq!(json[keys::BT_MAC], "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn test_legacy_tier_omits_gated_fields() {
        let json = as_json(&BtCodec.pack(&bt_info(), SoftBusVersion::OldV2).unwrap());
        let object = json.as_object().unwrap();
        assert!(!object.contains_key(keys::SW_VERSION));
        assert!(!object.contains_key(keys::MASTER_UDID));
        assert!(!object.contains_key(keys::MASTER_WEIGHT));
        assert!(object.contains_key(keys::DEVICE_NAME));
        assert!(object.contains_key(keys::TRANSPORT_PROTOCOL));
    }

    #[test]
    fn test_roundtrip_both_tiers() {
        let info = bt_info();
        let packed = BtCodec.pack(&info, SoftBusVersion::NewV1).unwrap();
        assert_eq!(BtCodec.unpack(&packed, SoftBusVersion::NewV1).unwrap(), info);

        let packed = BtCodec.pack(&info, SoftBusVersion::OldV1).unwrap();
        let unpacked = BtCodec.unpack(&packed, SoftBusVersion::OldV1).unwrap();
        let mut expected = info;
        expected.strip_new_tier_fields();
        assert_eq!(unpacked, expected);
    }

    #[test]
    fn test_legacy_unpack_ignores_gated_fields() {
        let packed = BtCodec.pack(&bt_info(), SoftBusVersion::NewV1).unwrap();
        let info = BtCodec.unpack(&packed, SoftBusVersion::OldV1).unwrap();
        assert_eq!(info.software_version, None);
        assert_eq!(info.master_weight, None);
    }

    #[test]
    fn test_missing_protocol_mask_defaults_to_br_ble() {
        let json = br#"{"CODE":5,"DEVICE_UDID":"u","NETWORK_ID":"n"}"#;
        let info = BtCodec.unpack(json, SoftBusVersion::OldV1).unwrap();
        assert_eq!(info.supported_protocols, ProtocolMask::BT_DEFAULT);
        assert_eq!(info.bt_mac, None);
        assert_eq!(info.device_name, "");
    }

    #[test]
    fn test_missing_udid_is_parse_error() {
        let json = br#"{"CODE":5,"NETWORK_ID":"n"}"#;
        assert!(matches!(
            BtCodec.unpack(json, SoftBusVersion::NewV1),
            Err(ExchangeError::Parse(_))
        ));
    }

    #[test]
    fn test_wrong_code_rejected() {
        let json = br#"{"CODE":1,"DEVICE_UDID":"u","NETWORK_ID":"n"}"#;
        assert!(matches!(
            BtCodec.unpack(json, SoftBusVersion::NewV1),
            Err(ExchangeError::Parse(_))
        ));
    }
}
