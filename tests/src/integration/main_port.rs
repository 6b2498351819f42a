//! At most one interface is ever the main IP interface, however the
//! addresses churn.

use super::fixtures::{address_added, address_removed, ip, Stack};
use lnn_bus::{LnnEvent, WifiState};
use lnn_network::{LnnNetworkApi, SubnetStatus};
use lnn_types::{ConnectionAddrType, NodeLedger, StrKey, LOOPBACK_IFNAME};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NETIFS: [(&str, u32); 3] = [("eth0", 2), ("wlan0", 3), ("eth1", 4)];

fn assert_single_main(s: &Stack, step: usize) {
    let holder = s.main_port.holder();
    let running = s.running();
    assert!(running.len() <= 1, "step {step}: running on {running:?}");
    if let Some(name) = running.first() {
        assert_eq!(holder.as_deref(), Some(name.as_str()), "step {step}");
    }

    let ledger_name = s.ledger.get_str(StrKey::NetIfName);
    match &holder {
        Some(name) => assert_eq!(ledger_name.as_deref(), Some(name.as_str()), "step {step}"),
        None => assert_eq!(ledger_name.as_deref(), Some(LOOPBACK_IFNAME), "step {step}"),
    }
}

fn random_step(s: &Stack, rng: &mut StdRng) {
    let (if_name, index) = NETIFS[rng.gen_range(0..NETIFS.len())];
    match rng.gen_range(0..5) {
        0 | 1 => {
            s.net.set_ip(if_name, ip(rng.gen_range(2..6)));
            s.replay(vec![address_added(index)]);
        }
        2 => {
            s.net.clear_ip(if_name);
            s.replay(vec![address_removed(index)]);
        }
        3 => {
            let addr_type = match rng.gen_range(0..3) {
                0 => Some(ConnectionAddrType::Wlan),
                1 => Some(ConnectionAddrType::Eth),
                _ => None,
            };
            s.manager.notify_all_type_offline(addr_type);
        }
        _ => {
            s.bus
                .publish(&LnnEvent::WifiStateChanged {
                    state: WifiState::Connected,
                })
                .unwrap();
        }
    }
}

#[test]
fn test_single_main_interface_under_random_churn() {
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let s = Stack::start("0:eth0,1:wlan0,0:eth1");
        assert_single_main(&s, 0);

        for step in 1..=60 {
            random_step(&s, &mut rng);
            assert_single_main(&s, step);
        }
    }
}

#[test]
fn test_main_moves_after_holder_goes_down() {
    let s = Stack::start("0:eth0,1:wlan0");
    s.net.set_ip("eth0", ip(2));
    s.replay(vec![address_added(2)]);
    s.net.set_ip("wlan0", ip(3));
    s.replay(vec![address_added(3)]);
    assert_eq!(s.main_port.holder().as_deref(), Some("eth0"));
    assert_eq!(s.status("wlan0"), Some(SubnetStatus::Idle));

    s.net.clear_ip("eth0");
    s.replay(vec![address_removed(2), address_added(3)]);

    assert_eq!(s.main_port.holder().as_deref(), Some("wlan0"));
    assert_eq!(s.running(), vec!["wlan0".to_string()]);
}

#[test]
fn test_main_freed_when_resetting_holder_loses_address() {
    let s = Stack::start("0:eth0,1:wlan0");
    s.net.set_ip("eth0", ip(2));
    s.replay(vec![address_added(2)]);
    s.net.set_ip("eth0", ip(4));
    s.replay(vec![address_added(2)]);
    assert_eq!(s.status("eth0"), Some(SubnetStatus::Resetting));

    s.net.clear_ip("eth0");
    s.net.set_ip("wlan0", ip(3));
    s.replay(vec![address_removed(2), address_added(3)]);

    assert_eq!(s.status("eth0"), Some(SubnetStatus::Shutdown));
    assert_eq!(s.running(), vec!["wlan0".to_string()]);
}
