//! Ledger -> codec -> session cipher -> peer, across transports and tiers.

use super::fixtures::{address_added, address_removed, ip, Stack};
use lnn_crypto::{SessionKey, SessionKeyStore};
use lnn_exchange::codec::keys;
use lnn_exchange::{BtCodec, DescriptorCodec, DeviceInfoExchange, ExchangeError};
use lnn_types::{
    AuthLinkType, AuthSide, ConnectOption, InMemoryNodeLedger, NodeLedger, NumKey, ProtocolMask,
    ProtocolType, SoftBusVersion, StrKey,
};
use std::sync::Arc;

const LOCAL_SEQ: i64 = 11;
const PEER_SEQ: i64 = 12;

struct Peers {
    local: DeviceInfoExchange,
    peer: DeviceInfoExchange,
}

fn seed_identity(ledger: &dyn NodeLedger) {
    ledger.set_str(StrKey::DeviceName, "tablet").unwrap();
    ledger.set_str(StrKey::DeviceUdid, "udid-tablet").unwrap();
    ledger.set_str(StrKey::NetworkId, "net-tablet").unwrap();
    ledger.set_str(StrKey::BtMac, "11:22:33:44:55:66").unwrap();
    ledger.set_str(StrKey::SoftbusVersion, "11.0.0.100").unwrap();
    ledger.set_str(StrKey::MasterNodeUdid, "udid-tablet").unwrap();
    ledger.set_num(NumKey::MasterNodeWeight, 3).unwrap();
    let protocols = ProtocolMask::NONE
        .with(ProtocolType::Ip)
        .with(ProtocolType::Br);
    ledger
        .set_num(NumKey::TransportProtocols, protocols.bits() as i64)
        .unwrap();
}

/// `option_of_local` is how the peer addresses the local device and vice
/// versa; both ends share one generated key.
fn peers(
    ledger: Arc<dyn NodeLedger>,
    option_of_local: ConnectOption,
    option_of_peer: ConnectOption,
) -> Peers {
    let key = SessionKey::generate();
    let local_keys = Arc::new(SessionKeyStore::new());
    local_keys.insert(
        LOCAL_SEQ,
        option_of_peer,
        AuthSide::Client,
        SessionKey::from_bytes(*key.as_bytes()),
    );
    let peer_keys = Arc::new(SessionKeyStore::new());
    peer_keys.insert(PEER_SEQ, option_of_local, AuthSide::Server, key);

    Peers {
        local: DeviceInfoExchange::new(ledger, local_keys),
        peer: DeviceInfoExchange::new(Arc::new(InMemoryNodeLedger::new()), peer_keys),
    }
}

fn br(mac: &str) -> ConnectOption {
    ConnectOption::Br {
        mac: mac.to_string(),
    }
}

fn wlan(last: u8) -> ConnectOption {
    ConnectOption::Wlan {
        ip: ip(last),
        port: 40_001,
    }
}

fn option_for(link: AuthLinkType, who: u8) -> ConnectOption {
    match link {
        AuthLinkType::Wifi => wlan(who),
        AuthLinkType::Ble => ConnectOption::Ble {
            mac: format!("ble-{who}"),
        },
        _ => br(&format!("br-{who}")),
    }
}

fn exchange(
    p: &Peers,
    version: SoftBusVersion,
    link: AuthLinkType,
    local_option: &ConnectOption,
) -> Result<lnn_types::NodeInfo, ExchangeError> {
    let sealed = p.local.pack(LOCAL_SEQ, version, link)?;
    p.peer.unpack(
        &sealed.payload,
        local_option,
        sealed.side.opposite(),
        version,
        link,
    )
}

// =============================================================================
// TEST GROUP 1: Round Trips
// =============================================================================

#[test]
fn test_round_trip_over_every_supported_link_and_tier() {
    let links = [AuthLinkType::Wifi, AuthLinkType::Br, AuthLinkType::Ble];
    let versions = [
        SoftBusVersion::OldV1,
        SoftBusVersion::OldV2,
        SoftBusVersion::NewV1,
    ];

    for link in links {
        let ledger = Arc::new(InMemoryNodeLedger::new());
        seed_identity(&*ledger);
        let local_option = option_for(link, 1);
        let p = peers(ledger, local_option.clone(), option_for(link, 2));

        for version in versions {
            let info = exchange(&p, version, link, &local_option).unwrap();
            assert_eq!(info.udid, "udid-tablet", "{link:?} {version:?}");
            assert_eq!(info.network_id, "net-tablet", "{link:?} {version:?}");
            assert!(info.supported_protocols.contains(ProtocolType::Ip));

            let new_tier = version.is_new_tier();
            assert_eq!(info.master_udid.is_some(), new_tier, "{link:?} {version:?}");
            assert_eq!(info.software_version.is_some(), new_tier);
            assert_eq!(
                info.bt_mac.is_some(),
                link != AuthLinkType::Wifi,
                "{link:?} {version:?}"
            );
        }
    }
}

#[test]
fn test_p2p_link_is_not_exchanged() {
    let ledger = Arc::new(InMemoryNodeLedger::new());
    seed_identity(&*ledger);
    let p = peers(ledger, br("a"), br("b"));

    let result = p
        .local
        .pack(LOCAL_SEQ, SoftBusVersion::NewV1, AuthLinkType::P2p);
    assert!(matches!(
        result,
        Err(ExchangeError::UnsupportedTransport(AuthLinkType::P2p))
    ));
}

// =============================================================================
// TEST GROUP 2: Version-Gated Keys
// =============================================================================

#[test]
fn test_bt_plaintext_keys_follow_tier() {
    let ledger = Arc::new(InMemoryNodeLedger::new());
    seed_identity(&*ledger);
    let p = peers(ledger, br("a"), br("b"));
    let info = p.local.local_node_info(AuthLinkType::Br).unwrap();

    let new_json: serde_json::Value =
        serde_json::from_slice(&BtCodec.pack(&info, SoftBusVersion::NewV1).unwrap()).unwrap();
    let old_json: serde_json::Value =
        serde_json::from_slice(&BtCodec.pack(&info, SoftBusVersion::OldV2).unwrap()).unwrap();

    for key in [keys::SW_VERSION, keys::MASTER_UDID, keys::MASTER_WEIGHT] {
        assert!(new_json.get(key).is_some(), "{key} missing at new tier");
        assert!(old_json.get(key).is_none(), "{key} leaked to legacy tier");
    }
    assert_eq!(new_json[keys::CODE], 5);
    assert_eq!(old_json[keys::BT_MAC], "11:22:33:44:55:66");
}

// =============================================================================
// TEST GROUP 3: Live Ports
// =============================================================================

#[test]
fn test_wifi_descriptor_carries_ports_of_running_subnet() {
    let s = Stack::start("0:eth0,1:wlan0");
    seed_identity(&*s.ledger);
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(3)]);
    let auth_port = s.ledger.get_num(NumKey::AuthPort).unwrap();

    let p = peers(s.ledger.clone(), wlan(5), wlan(8));
    let info = exchange(&p, SoftBusVersion::NewV1, AuthLinkType::Wifi, &wlan(5)).unwrap();

    assert_eq!(info.auth_port.map(i64::from), Some(auth_port));
    assert!(info.session_port.is_some());
    assert!(info.proxy_port.is_some());
}

#[test]
fn test_wifi_descriptor_after_link_loss_reports_closed_auth_port() {
    let s = Stack::start("0:eth0,1:wlan0");
    seed_identity(&*s.ledger);
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(3)]);
    s.net.clear_ip("wlan0");
    s.replay(vec![address_removed(3)]);

    let p = peers(s.ledger.clone(), wlan(5), wlan(8));
    let info = exchange(&p, SoftBusVersion::NewV1, AuthLinkType::Wifi, &wlan(5)).unwrap();

    assert_eq!(info.auth_port, Some(0));
}
