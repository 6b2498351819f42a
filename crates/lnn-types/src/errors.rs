//! # Error Types
//!
//! Registration and configuration failures shared across LNN crates.

use thiserror::Error;

/// Failures rejected synchronously at the call site.
///
/// None of these are retried; the caller must wait for external state to
/// change (a slot freeing up, a protocol being deregistered).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LnnError {
    /// The item is already registered.
    #[error("already registered: {0}")]
    AlreadyRegistered(String),

    /// A bounded table has no free slot.
    #[error("table full: capacity {capacity} reached")]
    TableFull {
        /// Fixed capacity of the table.
        capacity: usize,
    },

    /// The argument failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested item does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An external collaborator refused or failed the operation.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}
