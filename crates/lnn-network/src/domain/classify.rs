//! # Event Classification
//!
//! Maps an interface observation onto a [`SubnetEvent`]. The rules differ
//! for running and non-running subnets.

use crate::domain::main_port::MainPortSnapshot;
use crate::domain::subnet::{SubnetEvent, SubnetStatus};
use std::net::IpAddr;

/// Classify an observation of `if_name`.
///
/// `live_ip` is the interface's current non-loopback address, if any.
/// Returns `None` when nothing needs to happen.
pub fn classify(
    status: SubnetStatus,
    if_name: &str,
    live_ip: Option<IpAddr>,
    main: &MainPortSnapshot,
) -> Option<SubnetEvent> {
    if status == SubnetStatus::Running {
        classify_running(if_name, live_ip, main)
    } else {
        classify_other(status, live_ip)
    }
}

fn classify_running(
    if_name: &str,
    live_ip: Option<IpAddr>,
    main: &MainPortSnapshot,
) -> Option<SubnetEvent> {
    // Any other holder, the loopback placeholder included, yields IfReady
    // even when that interface was never enabled on this protocol.
    if main.if_name != if_name {
        return Some(SubnetEvent::IfReady);
    }
    let Some(live) = live_ip else {
        return Some(SubnetEvent::IfDown);
    };
    if main.ip == live {
        None
    } else {
        Some(SubnetEvent::IfChanged)
    }
}

fn classify_other(status: SubnetStatus, live_ip: Option<IpAddr>) -> Option<SubnetEvent> {
    match live_ip {
        Some(_) => Some(SubnetEvent::IfReady),
        None if status == SubnetStatus::Shutdown => None,
        None => Some(SubnetEvent::IfDown),
    }
}
