//! # Event Handlers
//!
//! Defines the receiving side of the bus.

use crate::events::LnnEvent;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a handler. Logged by the bus, never propagated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

/// Trait for components that react to bus events.
///
/// Handlers run on the publisher's thread and must not block for long:
/// the interface monitor waits for every handler before reading its next
/// notification.
pub trait EventHandler: Send + Sync {
    /// React to an event.
    fn handle(&self, event: &LnnEvent) -> Result<(), HandlerError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// Handler backed by a closure.
pub struct FnHandler<F> {
    name: &'static str,
    f: F,
}

impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&LnnEvent) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, event: &LnnEvent) -> Result<(), HandlerError> {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Wrap a closure as a shareable handler.
pub fn handler_fn<F>(name: &'static str, f: F) -> Arc<FnHandler<F>>
where
    F: Fn(&LnnEvent) -> Result<(), HandlerError> + Send + Sync,
{
    Arc::new(FnHandler { name, f })
}
