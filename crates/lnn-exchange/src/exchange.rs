//! # Device-Info Exchange
//!
//! Builds the local descriptor from the node ledger, seals it for a peer,
//! and opens and parses what the peer sends back.

use crate::codec::codec_for;
use crate::ports::AuthCipher;
use crate::ExchangeError;
use lnn_telemetry::{metric_inc, DESCRIPTOR_EXCHANGES};
use lnn_types::{
    AuthLinkType, AuthSide, ConnectOption, NodeInfo, NodeLedger, NumKey, ProtocolMask, StrKey,
    SoftBusVersion,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// A sealed descriptor ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedDescriptor {
    /// Ciphertext, exactly `plaintext + overhead` bytes long.
    pub payload: Vec<u8>,
    /// Local side of the session that sealed it.
    pub side: AuthSide,
}

/// Descriptor exchange over an authenticated session.
pub struct DeviceInfoExchange {
    ledger: Arc<dyn NodeLedger>,
    cipher: Arc<dyn AuthCipher>,
}

fn record(direction: &str, result: &Result<impl Sized, ExchangeError>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    metric_inc!(DESCRIPTOR_EXCHANGES, &[direction, outcome]);
}

impl DeviceInfoExchange {
    /// Create an exchange reading local attributes from `ledger`.
    pub fn new(ledger: Arc<dyn NodeLedger>, cipher: Arc<dyn AuthCipher>) -> Self {
        Self { ledger, cipher }
    }

    /// Snapshot the local node as it should be described over `link`.
    pub fn local_node_info(&self, link: AuthLinkType) -> Result<NodeInfo, ExchangeError> {
        let str_of = |key: StrKey| self.ledger.get_str(key).unwrap_or_default();
        let required = |key: StrKey| {
            self.ledger
                .get_str(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ExchangeError::InvalidArgument(format!("ledger has no {key:?}")))
        };
        let num_of = |key: NumKey| self.ledger.get_num(key).unwrap_or(0);
        let port_of = |key: NumKey| {
            self.ledger
                .get_num(key)
                .and_then(|v| u16::try_from(v).ok())
        };

        let mut info = NodeInfo {
            device_name: str_of(StrKey::DeviceName),
            device_type_id: u16::try_from(num_of(NumKey::DeviceTypeId)).unwrap_or(0),
            udid: required(StrKey::DeviceUdid)?,
            network_id: required(StrKey::NetworkId)?,
            version_type: str_of(StrKey::VersionType),
            net_capability: u32::try_from(num_of(NumKey::NetCapability)).unwrap_or(0),
            p2p_role: i32::try_from(num_of(NumKey::P2pRole)).unwrap_or(0),
            p2p_mac: str_of(StrKey::P2pMac),
            supported_protocols: self
                .ledger
                .get_num(NumKey::TransportProtocols)
                .and_then(|v| u64::try_from(v).ok())
                .map_or(ProtocolMask::NONE, ProtocolMask::from_bits),
            software_version: self.ledger.get_str(StrKey::SoftbusVersion),
            master_udid: self.ledger.get_str(StrKey::MasterNodeUdid),
            master_weight: self
                .ledger
                .get_num(NumKey::MasterNodeWeight)
                .and_then(|v| i32::try_from(v).ok()),
            ..NodeInfo::default()
        };

        match link {
            AuthLinkType::Br | AuthLinkType::Ble => {
                info.bt_mac = self.ledger.get_str(StrKey::BtMac);
            }
            AuthLinkType::Wifi => {
                info.auth_port = port_of(NumKey::AuthPort);
                info.session_port = port_of(NumKey::SessionPort);
                info.proxy_port = port_of(NumKey::ProxyPort);
            }
            AuthLinkType::P2p => return Err(ExchangeError::UnsupportedTransport(link)),
        }
        Ok(info)
    }

    /// Pack the local descriptor and seal it under session `seq`.
    pub fn pack(
        &self,
        seq: i64,
        version: SoftBusVersion,
        link: AuthLinkType,
    ) -> Result<SealedDescriptor, ExchangeError> {
        let result = self.pack_inner(seq, version, link);
        record("pack", &result);
        result
    }

    fn pack_inner(
        &self,
        seq: i64,
        version: SoftBusVersion,
        link: AuthLinkType,
    ) -> Result<SealedDescriptor, ExchangeError> {
        let codec = codec_for(link)?;
        let info = self.local_node_info(link)?;
        let json = codec.pack(&info, version)?;

        let (payload, side) = self
            .cipher
            .encrypt_by_seq(seq, &json)
            .map_err(|e| ExchangeError::Encrypt(e.to_string()))?;

        let expected = json.len() + self.cipher.overhead_len();
        if payload.len() != expected {
            return Err(ExchangeError::Encrypt(format!(
                "sealed {} bytes, expected {expected}",
                payload.len()
            )));
        }
        debug!(seq, link = ?link, version = ?version, len = payload.len(), "Descriptor packed");
        Ok(SealedDescriptor { payload, side })
    }

    /// Open and parse a peer descriptor received from `option`.
    pub fn unpack(
        &self,
        sealed: &[u8],
        option: &ConnectOption,
        side: AuthSide,
        version: SoftBusVersion,
        link: AuthLinkType,
    ) -> Result<NodeInfo, ExchangeError> {
        let result = self.unpack_inner(sealed, option, side, version, link);
        if let Err(e) = &result {
            warn!(link = ?link, error = %e, "Peer descriptor rejected");
        }
        record("unpack", &result);
        result
    }

    fn unpack_inner(
        &self,
        sealed: &[u8],
        option: &ConnectOption,
        side: AuthSide,
        version: SoftBusVersion,
        link: AuthLinkType,
    ) -> Result<NodeInfo, ExchangeError> {
        let overhead = self.cipher.overhead_len();
        if sealed.len() <= overhead {
            return Err(ExchangeError::InvalidArgument(format!(
                "{} byte payload cannot hold a {overhead} byte header and a body",
                sealed.len()
            )));
        }
        let codec = codec_for(link)?;

        let mut plaintext = self
            .cipher
            .decrypt(option, side, sealed)
            .map_err(|e| ExchangeError::Decrypt(e.to_string()))?;
        // Senders may include a C string terminator.
        if plaintext.last() == Some(&0) {
            plaintext.pop();
        }

        let info = codec.unpack(&plaintext, version)?;
        debug!(link = ?link, udid = %info.udid, "Descriptor unpacked");
        Ok(info)
    }
}
