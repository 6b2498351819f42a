//! The subnet table never grows past its bound.

use super::fixtures::{address_added, ip, Stack};
use lnn_network::domain::NetifEntry;
use lnn_network::{LnnNetworkApi, ProtocolManager, SubnetStatus, VisitControl, MAX_SUBNETS};
use lnn_types::{LnnError, NetifType, ProtocolType};
use std::sync::Arc;

const FIVE_NETIFS: &str = "0:eth0,1:wlan0,0:eth1,1:wlan1,0:eth2";

fn ip_protocol(s: &Stack) -> Arc<dyn ProtocolManager> {
    let mut found = None;
    s.manager.visit_protocol(&mut |p| {
        if p.id() == ProtocolType::Ip {
            found = Some(p.clone());
            return VisitControl::Stop;
        }
        VisitControl::Continue
    });
    found.unwrap()
}

#[test]
fn test_fifth_interface_is_skipped_at_startup() {
    let s = Stack::start(FIVE_NETIFS);

    assert_eq!(s.manager.table().len(), MAX_SUBNETS);
    assert_eq!(s.status("eth2"), None);
    for name in ["eth0", "wlan0", "eth1", "wlan1"] {
        assert_eq!(s.status(name), Some(SubnetStatus::Shutdown), "{name}");
    }
}

#[test]
fn test_full_table_rejects_enable_and_keeps_existing() {
    let s = Stack::start(FIVE_NETIFS);
    s.net.set_ip("wlan0", ip(5));
    s.replay(vec![address_added(3)]);

    let result = ip_protocol(&s).enable(&NetifEntry::new("eth2", NetifType::Eth));

    assert!(matches!(result, Err(LnnError::TableFull { capacity: MAX_SUBNETS })));
    assert_eq!(s.manager.table().len(), MAX_SUBNETS);
    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Running));
}

#[test]
fn test_disable_frees_a_slot() {
    let s = Stack::start(FIVE_NETIFS);
    let ip_proto = ip_protocol(&s);

    ip_proto
        .disable(&NetifEntry::new("eth1", NetifType::Eth))
        .unwrap();
    ip_proto
        .enable(&NetifEntry::new("eth2", NetifType::Eth))
        .unwrap();

    assert_eq!(s.manager.table().len(), MAX_SUBNETS);
    assert_eq!(s.status("eth1"), None);
    assert_eq!(s.status("eth2"), Some(SubnetStatus::Shutdown));
}
