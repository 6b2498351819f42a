//! Tests for the interface monitor

use super::*;
use crate::adapters::mocks::{ScriptedSource, StaticNetQuery};
use crate::config::MonitorConfig;
use lnn_bus::{handler_fn, EventBus, LnnEvent, LnnEventType};
use lnn_types::NetifType;
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn net() -> Arc<StaticNetQuery> {
    Arc::new(
        StaticNetQuery::new()
            .with_netif("eth0", NetifType::Eth, 2)
            .with_netif("wlan0", NetifType::Wlan, 3)
            .with_netif("ble0", NetifType::Ble, 4),
    )
}

fn recording_bus() -> (Arc<EventBus>, Arc<Mutex<Vec<String>>>) {
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.register_handler(
        LnnEventType::IpAddrChanged,
        handler_fn("recorder", move |event| {
            if let LnnEvent::IpAddrChanged { if_name } = event {
                sink.lock().push(if_name.clone());
            }
            Ok(())
        }),
    )
    .unwrap();
    (bus, seen)
}

fn notification(kind: NotificationKind, if_index: u32) -> RawNotification {
    RawNotification {
        kind,
        if_index,
        if_name: None,
    }
}

fn fast_policy(max_restarts: u32) -> MonitorConfig {
    MonitorConfig {
        restart_backoff_ms: 1,
        max_backoff_ms: 2,
        max_restarts,
    }
}

// =============================================================================
// TEST GROUP 1: Classification and filtering
// =============================================================================

#[test]
fn test_ip_interfaces_publish() {
    let (bus, seen) = recording_bus();
    let net = net();

    assert!(dispatch_notification(
        &notification(NotificationKind::AddressAdded, 3),
        &*net,
        &bus
    ));
    assert!(dispatch_notification(
        &notification(NotificationKind::LinkDown, 2),
        &*net,
        &bus
    ));
    assert_eq!(*seen.lock(), vec!["wlan0", "eth0"]);
}

#[test]
fn test_non_ip_interfaces_dropped() {
    let (bus, seen) = recording_bus();
    let net = net();

    assert!(!dispatch_notification(
        &notification(NotificationKind::AddressAdded, 4),
        &*net,
        &bus
    ));
    assert!(!dispatch_notification(
        &notification(NotificationKind::AddressAdded, 99),
        &*net,
        &bus
    ));
    assert!(seen.lock().is_empty());
}

#[test]
fn test_name_from_message_wins() {
    let (bus, seen) = recording_bus();
    let net = net();
    let named = RawNotification {
        kind: NotificationKind::AddressRemoved,
        if_index: 99,
        if_name: Some("wlan0".to_string()),
    };
    assert!(dispatch_notification(&named, &*net, &bus));
    assert_eq!(*seen.lock(), vec!["wlan0"]);
}

// =============================================================================
// TEST GROUP 2: Supervision
// =============================================================================

#[test]
fn test_batches_processed_in_order() {
    let (bus, seen) = recording_bus();
    let source = ScriptedSource::new("scripted")
        .then_batch(Ok(vec![
            notification(NotificationKind::AddressAdded, 3),
            notification(NotificationKind::AddressAdded, 2),
        ]))
        .then_batch(Ok(vec![notification(NotificationKind::LinkUp, 3)]));

    let handles = start_monitors(
        vec![Box::new(source) as Box<dyn NotificationSource>],
        &fast_policy(0),
        net(),
        bus,
    )
    .unwrap();
    for handle in handles {
        handle.join();
    }
    assert_eq!(*seen.lock(), vec!["wlan0", "eth0", "wlan0"]);
}

#[test]
fn test_read_error_restarts_source() {
    let (bus, seen) = recording_bus();
    let source = ScriptedSource::new("flaky")
        .then_batch(Err(MonitorError::Io("recv failed".into())))
        .then_batch(Ok(vec![notification(NotificationKind::AddressAdded, 3)]));
    let opens = source.open_counter();

    let handles = start_monitors(
        vec![Box::new(source) as Box<dyn NotificationSource>],
        &fast_policy(0),
        net(),
        bus,
    )
    .unwrap();
    for handle in handles {
        handle.join();
    }
    assert_eq!(opens.load(Ordering::SeqCst), 2);
    assert_eq!(*seen.lock(), vec!["wlan0"]);
}

#[test]
fn test_restart_budget_exhausted() {
    let (bus, _) = recording_bus();
    let source = ScriptedSource::new("broken")
        .then_batch(Err(MonitorError::Io("recv failed".into())))
        .then_open(Ok(()))
        .then_open(Err(MonitorError::Io("socket".into())))
        .then_open(Err(MonitorError::Io("socket".into())));

    let mut handles = start_monitors(
        vec![Box::new(source) as Box<dyn NotificationSource>],
        &fast_policy(2),
        net(),
        bus,
    )
    .unwrap();
    assert_eq!(handles.remove(0).join(), MonitorHealth::Failed);
}

#[test]
fn test_restart_budget_resets_after_recovery() {
    let (bus, seen) = recording_bus();
    let source = ScriptedSource::new("transient")
        .then_batch(Err(MonitorError::Io("recv failed".into())))
        .then_batch(Ok(vec![notification(NotificationKind::AddressAdded, 3)]))
        .then_batch(Err(MonitorError::Io("recv failed".into())))
        .then_batch(Ok(vec![notification(NotificationKind::AddressAdded, 2)]));

    let mut handles = start_monitors(
        vec![Box::new(source) as Box<dyn NotificationSource>],
        &fast_policy(1),
        net(),
        bus,
    )
    .unwrap();

    // Each error follows healthy traffic, so neither exhausts the budget.
    assert_eq!(handles.remove(0).join(), MonitorHealth::Stopped);
    assert_eq!(*seen.lock(), vec!["wlan0", "eth0"]);
}

#[test]
fn test_closed_source_stops_cleanly() {
    let (bus, _) = recording_bus();
    let mut handles = start_monitors(
        vec![Box::new(ScriptedSource::new("empty")) as Box<dyn NotificationSource>],
        &fast_policy(0),
        net(),
        bus,
    )
    .unwrap();
    assert_eq!(handles.remove(0).join(), MonitorHealth::Stopped);
}

// =============================================================================
// TEST GROUP 3: Startup
// =============================================================================

#[test]
fn test_required_source_fails_fast() {
    let (bus, _) = recording_bus();
    let sources: Vec<Box<dyn NotificationSource>> = vec![
        Box::new(ScriptedSource::new("first")),
        Box::new(ScriptedSource::new("second").then_open(Err(MonitorError::Io("nope".into())))),
    ];
    let result = start_monitors(sources, &fast_policy(0), net(), bus);
    assert!(matches!(
        result,
        Err(MonitorError::StartFailed { ref name, .. }) if name == "second"
    ));
}

#[test]
fn test_optional_source_skipped() {
    let (bus, _) = recording_bus();
    let sources: Vec<Box<dyn NotificationSource>> = vec![
        Box::new(
            ScriptedSource::new("optional")
                .optional()
                .then_open(Err(MonitorError::Io("nope".into()))),
        ),
        Box::new(ScriptedSource::new("required")),
    ];
    let handles = start_monitors(sources, &fast_policy(0), net(), bus).unwrap();
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].name(), "required");
    for handle in handles {
        handle.join();
    }
}
