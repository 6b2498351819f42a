//! # LNN Bus - Direct-Call Event Dispatcher
//!
//! Typed publish/subscribe registry for LNN components.
//!
//! ## Dispatch Rules
//!
//! - `publish()` invokes every handler registered for the event's type
//!   synchronously, in registration order, on the caller's thread.
//! - No queue, no priority, no cross-thread marshalling.
//! - A handler that fails (error or panic) is logged and skipped; sibling
//!   handlers still run.
//!
//! ```text
//! ┌──────────────┐  publish()   ┌──────────────┐  handle()  ┌───────────┐
//! │ Netif Monitor│ ───────────→ │   EventBus   │ ─────────→ │ Handler 1 │
//! └──────────────┘              │              │ ─────────→ │ Handler 2 │
//!                               └──────────────┘            └───────────┘
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bus;
pub mod events;
pub mod handler;

pub use bus::{BusError, EventBus};
pub use events::{LnnEvent, LnnEventType, WifiState};
pub use handler::{handler_fn, EventHandler, FnHandler, HandlerError};
