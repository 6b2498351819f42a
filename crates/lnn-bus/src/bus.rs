//! # Event Bus
//!
//! Registry of handlers keyed by event type plus synchronous dispatch.

use crate::events::{LnnEvent, LnnEventType};
use crate::handler::EventHandler;
use lnn_telemetry::{metric_inc, EVENT_BUS_EVENTS_PUBLISHED, EVENT_BUS_HANDLER_FAILURES};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The same handler is already registered for this event type.
    #[error("handler already registered for {0:?}")]
    AlreadyRegistered(LnnEventType),

    /// The event payload failed validation and was not dispatched.
    #[error("invalid event {event_type:?}: {reason}")]
    InvalidEvent {
        /// Type of the rejected event.
        event_type: LnnEventType,
        /// Why it was rejected.
        reason: String,
    },
}

/// Direct-call event dispatcher.
///
/// Handlers are snapshotted before dispatch, so a handler may register or
/// unregister handlers while it runs without deadlocking the bus.
#[derive(Default)]
pub struct EventBus {
    /// Handlers by event type, in registration order.
    handlers: RwLock<HashMap<LnnEventType, Vec<Arc<dyn EventHandler>>>>,

    /// Total events dispatched.
    events_published: AtomicU64,
}

fn same_handler(a: &Arc<dyn EventHandler>, b: &Arc<dyn EventHandler>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event_type`.
    ///
    /// Registering the same handler instance twice for one type is rejected.
    pub fn register_handler(
        &self,
        event_type: LnnEventType,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), BusError> {
        let mut handlers = self.handlers.write();
        let list = handlers.entry(event_type).or_default();

        if list.iter().any(|h| same_handler(h, &handler)) {
            warn!(event_type = ?event_type, handler = handler.name(), "Duplicate handler rejected");
            return Err(BusError::AlreadyRegistered(event_type));
        }

        debug!(event_type = ?event_type, handler = handler.name(), "Handler registered");
        list.push(handler);
        Ok(())
    }

    /// Remove `handler` from `event_type`. Unknown handlers are ignored.
    pub fn unregister_handler(&self, event_type: LnnEventType, handler: &Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write();
        if let Some(list) = handlers.get_mut(&event_type) {
            let before = list.len();
            list.retain(|h| !same_handler(h, handler));
            if list.len() != before {
                debug!(event_type = ?event_type, handler = handler.name(), "Handler unregistered");
            }
            if list.is_empty() {
                handlers.remove(&event_type);
            }
        }
    }

    /// Dispatch `event` to every handler registered for its type.
    ///
    /// Returns the number of handlers invoked. Publishing with no handlers
    /// is a no-op returning zero.
    pub fn publish(&self, event: &LnnEvent) -> Result<usize, BusError> {
        let event_type = event.event_type();

        event.validate().map_err(|reason| {
            warn!(event_type = ?event_type, reason = %reason, "Invalid event dropped");
            BusError::InvalidEvent { event_type, reason }
        })?;

        let snapshot: Vec<Arc<dyn EventHandler>> = self
            .handlers
            .read()
            .get(&event_type)
            .cloned()
            .unwrap_or_default();

        self.events_published.fetch_add(1, Ordering::Relaxed);
        metric_inc!(EVENT_BUS_EVENTS_PUBLISHED, &[event_type.as_str()]);

        for handler in &snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    metric_inc!(EVENT_BUS_HANDLER_FAILURES, &[event_type.as_str()]);
                    warn!(
                        event_type = ?event_type,
                        handler = handler.name(),
                        error = %e,
                        "Handler failed"
                    );
                }
                Err(_) => {
                    metric_inc!(EVENT_BUS_HANDLER_FAILURES, &[event_type.as_str()]);
                    warn!(event_type = ?event_type, handler = handler.name(), "Handler panicked");
                }
            }
        }

        debug!(event_type = ?event_type, receivers = snapshot.len(), "Event published");
        Ok(snapshot.len())
    }

    /// Number of handlers registered for `event_type`.
    #[must_use]
    pub fn handler_count(&self, event_type: LnnEventType) -> usize {
        self.handlers.read().get(&event_type).map_or(0, Vec::len)
    }

    /// Total events dispatched since creation.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
