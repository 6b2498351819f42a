//! # Subnet Lifecycle
//!
//! A subnet is one live (interface, protocol) binding. The transition table
//! here is pure; the owning protocol decides whether an attempted action
//! was accepted.

use lnn_telemetry::{metric_inc, SUBNET_TRANSITIONS};
use lnn_types::ProtocolType;
use std::fmt;
use tracing::{info, warn};

/// Status of a subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubnetStatus {
    /// Registered, not yet serving.
    Idle,
    /// Serving traffic on its interface.
    Running,
    /// Interface has no usable address.
    Shutdown,
    /// Address changed while running; torn down and awaiting re-enable.
    Resetting,
}

impl fmt::Display for SubnetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Shutdown => "shutdown",
            Self::Resetting => "resetting",
        };
        f.write_str(s)
    }
}

/// Inputs to the subnet state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubnetEvent {
    /// A usable address now exists.
    IfReady,
    /// No usable address.
    IfDown,
    /// The bound address is no longer current.
    IfChanged,
}

impl SubnetEvent {
    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IfReady => "if_ready",
            Self::IfDown => "if_down",
            Self::IfChanged => "if_changed",
        }
    }
}

/// Status after `event` was attempted from `current`.
pub fn next_status(current: SubnetStatus, event: SubnetEvent, accepted: bool) -> SubnetStatus {
    match (event, accepted) {
        (SubnetEvent::IfReady, true) => SubnetStatus::Running,
        (SubnetEvent::IfReady, false) => SubnetStatus::Idle,
        (SubnetEvent::IfDown, true) => SubnetStatus::Shutdown,
        (SubnetEvent::IfChanged, true) => SubnetStatus::Resetting,
        (SubnetEvent::IfDown | SubnetEvent::IfChanged, false) => current,
    }
}

/// [`next_status`] plus the transition log line and counter.
pub fn transact(
    if_name: &str,
    protocol: ProtocolType,
    current: SubnetStatus,
    event: SubnetEvent,
    accepted: bool,
) -> SubnetStatus {
    let next = next_status(current, event, accepted);
    let outcome = if accepted { "accepted" } else { "rejected" };
    metric_inc!(SUBNET_TRANSITIONS, &[event.as_str(), outcome]);

    if accepted {
        info!(
            if_name,
            protocol = %protocol,
            event = event.as_str(),
            from = %current,
            to = %next,
            "Subnet transition"
        );
    } else {
        warn!(
            if_name,
            protocol = %protocol,
            event = event.as_str(),
            from = %current,
            to = %next,
            "Subnet transition rejected"
        );
    }
    next
}

/// A live (interface, protocol) binding.
///
/// Implementations are owned by the subnet table and must tolerate being
/// called from the monitor thread and from API callers concurrently.
pub trait Subnet: Send + Sync {
    /// Interface this subnet is bound to.
    fn if_name(&self) -> &str;

    /// Protocol serving this subnet.
    fn protocol(&self) -> ProtocolType;

    /// Current status.
    fn status(&self) -> SubnetStatus;

    /// Re-evaluate the interface and apply the resulting transition.
    fn on_netif_status_changed(&self);

    /// The mesh dropped every peer reached through this subnet.
    fn on_softbus_network_disconnected(&self);

    /// Release everything the subnet holds. Called once, after removal
    /// from the table.
    fn destroy(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: [SubnetStatus; 4] = [
        SubnetStatus::Idle,
        SubnetStatus::Running,
        SubnetStatus::Shutdown,
        SubnetStatus::Resetting,
    ];
    const EVENTS: [SubnetEvent; 3] = [
        SubnetEvent::IfReady,
        SubnetEvent::IfDown,
        SubnetEvent::IfChanged,
    ];

    #[test]
    fn test_accepted_targets() {
        for state in STATES {
            assert_eq!(
                next_status(state, SubnetEvent::IfReady, true),
                SubnetStatus::Running
            );
            assert_eq!(
                next_status(state, SubnetEvent::IfDown, true),
                SubnetStatus::Shutdown
            );
            assert_eq!(
                next_status(state, SubnetEvent::IfChanged, true),
                SubnetStatus::Resetting
            );
        }
    }

    #[test]
    fn test_rejected_targets() {
        for state in STATES {
            assert_eq!(
                next_status(state, SubnetEvent::IfReady, false),
                SubnetStatus::Idle
            );
            assert_eq!(next_status(state, SubnetEvent::IfDown, false), state);
            assert_eq!(next_status(state, SubnetEvent::IfChanged, false), state);
        }
    }

    #[test]
    fn test_table_is_total() {
        for state in STATES {
            for event in EVENTS {
                for accepted in [true, false] {
                    let next = next_status(state, event, accepted);
                    assert!(STATES.contains(&next));
                }
            }
        }
    }
}
