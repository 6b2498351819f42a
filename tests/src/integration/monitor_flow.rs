//! Kernel notification -> monitor -> bus -> IP subnet.

use super::fixtures::{address_added, address_removed, ip, Stack, BT_INDEX};
use lnn_bus::LnnEvent;
use lnn_network::adapters::mocks::PortKind;
use lnn_network::SubnetStatus;
use lnn_types::{ConnectionAddrType, NodeLedger, NumKey, StrKey};

const WLAN0: u32 = 3;

fn stack() -> Stack {
    Stack::start("0:eth0,1:wlan0")
}

// =============================================================================
// TEST GROUP 1: Address Lifecycle
// =============================================================================

#[test]
fn test_wlan_address_appears_and_subnet_runs() {
    let s = stack();
    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Shutdown));

    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(WLAN0)]);

    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Running));
    assert_eq!(s.discovery.link_ups(), 1);
    assert_eq!(
        s.listener.open_ports(),
        vec![PortKind::Auth, PortKind::Session, PortKind::Proxy]
    );
    assert_eq!(s.ledger.get_str(StrKey::NetIfName).as_deref(), Some("wlan0"));
    assert_eq!(
        s.ledger.get_str(StrKey::WlanIp).as_deref(),
        Some("192.168.1.5")
    );
    assert!(s.ledger.get_num(NumKey::AuthPort).unwrap_or(0) > 0);
}

#[test]
fn test_wlan_address_lost_and_subnet_shuts_down() {
    let s = stack();
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(WLAN0)]);
    let downs = s.discovery.link_downs();

    s.net.clear_ip("wlan0");
    s.replay(vec![address_removed(WLAN0)]);

    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Shutdown));
    assert_eq!(s.discovery.link_downs(), downs + 1);
    assert!(s.listener.open_ports().is_empty());
    assert_eq!(s.main_port.holder(), None);
    assert_eq!(s.mesh.requests(), vec![vec![ConnectionAddrType::Wlan]]);
}

#[test]
fn test_burst_of_notifications_settles_once() {
    let s = stack();
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![
        address_added(WLAN0),
        address_added(WLAN0),
        address_added(WLAN0),
    ]);

    // Later notifications see an unchanged address and classify to nothing.
    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Running));
    assert_eq!(s.discovery.link_ups(), 1);
    assert_eq!(s.listener.log().len(), 3);
}

#[test]
fn test_readdress_takes_resetting_then_running() {
    let s = stack();
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(WLAN0)]);

    s.net.set_ip("wlan0", ip(9));
    s.replay(vec![address_added(WLAN0)]);
    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Resetting));
    assert_eq!(s.main_port.holder().as_deref(), Some("wlan0"));

    // The resetting subnet waits for its next evaluation.
    s.replay(vec![address_added(WLAN0)]);
    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Running));
    assert_eq!(
        s.ledger.get_str(StrKey::WlanIp).as_deref(),
        Some("192.168.1.9")
    );
    assert_eq!(s.discovery.link_ups(), 2);
}

#[test]
fn test_repeated_down_is_idempotent() {
    let s = stack();
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(WLAN0)]);
    s.net.clear_ip("wlan0");
    s.replay(vec![address_removed(WLAN0)]);
    let log_len = s.listener.log().len();
    let downs = s.discovery.link_downs();

    s.replay(vec![address_removed(WLAN0), address_removed(WLAN0)]);

    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Shutdown));
    assert_eq!(s.discovery.link_downs(), downs);
    assert_eq!(s.listener.log().len(), log_len);
    assert_eq!(s.mesh.requests().len(), 1);
}

// =============================================================================
// TEST GROUP 2: Filtering
// =============================================================================

#[test]
fn test_non_ip_interface_is_dropped() {
    let s = stack();
    let before = s.bus.events_published();

    s.replay(vec![address_added(BT_INDEX)]);

    assert_eq!(s.bus.events_published(), before);
}

#[test]
fn test_unknown_index_is_dropped() {
    let s = stack();
    let before = s.bus.events_published();

    s.replay(vec![address_added(999)]);

    assert_eq!(s.bus.events_published(), before);
}

#[test]
fn test_ethernet_change_does_not_touch_wlan() {
    let s = stack();
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(WLAN0)]);

    s.net.set_ip("eth0", ip(7));
    s.replay(vec![address_added(2)]);

    // wlan0 keeps main, so eth0's enable is rejected.
    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Running));
    assert_eq!(s.status("eth0"), Some(SubnetStatus::Idle));
    assert_eq!(s.main_port.holder().as_deref(), Some("wlan0"));
}

// =============================================================================
// TEST GROUP 3: Mesh Feedback
// =============================================================================

#[test]
fn test_last_wlan_peer_offline_retries_resetting_subnet() {
    let s = stack();
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(WLAN0)]);
    s.net.set_ip("wlan0", ip(9));
    s.replay(vec![address_added(WLAN0)]);
    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Resetting));

    s.bus
        .publish(&LnnEvent::NodeOnlineStateChanged {
            udid: "peer".to_string(),
            is_online: false,
            addr_type: ConnectionAddrType::Wlan,
            online_count: 0,
        })
        .unwrap();

    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Running));
}
