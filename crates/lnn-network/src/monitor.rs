//! # Interface Monitor
//!
//! Turns OS routing/link notifications into `IpAddrChanged` bus events for
//! Ethernet and WLAN interfaces.
//!
//! Each [`NotificationSource`] runs on its own thread under a supervisor
//! that restarts it with exponential backoff when its blocking read fails.
//! Notifications from one source are processed strictly in arrival order.

mod supervisor;

pub use supervisor::{start_monitors, MonitorHandle, MonitorHealth};

use crate::ports::NetQuery;
use lnn_bus::{EventBus, LnnEvent};
use lnn_types::NetifType;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors from notification sources.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// Socket setup or read failed.
    #[error("monitor I/O error: {0}")]
    Io(String),

    /// The source has been shut down and will produce nothing more.
    #[error("monitor closed")]
    Closed,

    /// A required monitor could not be started.
    #[error("monitor '{name}' failed to start: {reason}")]
    StartFailed {
        /// Monitor name.
        name: String,
        /// Underlying error.
        reason: String,
    },
}

/// Kind of kernel notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// An address was added to the interface.
    AddressAdded,
    /// An address was removed from the interface.
    AddressRemoved,
    /// The link came up.
    LinkUp,
    /// The link went down.
    LinkDown,
}

/// One decoded kernel notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNotification {
    /// What changed.
    pub kind: NotificationKind,
    /// Kernel interface index.
    pub if_index: u32,
    /// Interface name when the message carried one.
    pub if_name: Option<String>,
}

/// An OS-specific notification stream.
pub trait NotificationSource: Send {
    /// Name used in logs and metrics.
    fn name(&self) -> &str;

    /// Whether startup must fail when this source cannot open.
    fn required(&self) -> bool {
        true
    }

    /// Open (or reopen) the underlying socket.
    fn open(&mut self) -> Result<(), MonitorError>;

    /// Block until the next batch of notifications arrives.
    fn next_batch(&mut self) -> Result<Vec<RawNotification>, MonitorError>;
}

/// Resolve and filter one notification, publishing `IpAddrChanged` on a
/// match. Returns whether an event was published.
pub fn dispatch_notification(
    notification: &RawNotification,
    net: &dyn NetQuery,
    bus: &EventBus,
) -> bool {
    let Some(if_name) = notification
        .if_name
        .clone()
        .or_else(|| net.if_name_by_index(notification.if_index))
    else {
        trace!(if_index = notification.if_index, "Unresolvable interface index");
        return false;
    };

    match net.netif_type(&if_name) {
        Some(NetifType::Eth | NetifType::Wlan) => {}
        other => {
            trace!(if_name = %if_name, netif_type = ?other, "Notification dropped");
            return false;
        }
    }

    debug!(if_name = %if_name, kind = ?notification.kind, "Interface changed");
    match bus.publish(&LnnEvent::IpAddrChanged { if_name }) {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "Address change not published");
            false
        }
    }
}

#[cfg(test)]
mod tests;
