//! # Protocol Registry
//!
//! Ordered list of transport managers, unique by protocol id. Holds no
//! negotiation state; that lives in the subnet table.

use crate::domain::{ProtocolManager, VisitControl};
use lnn_types::LnnError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Registered transports in registration order.
#[derive(Default)]
pub struct ProtocolRegistry {
    protocols: RwLock<Vec<Arc<dyn ProtocolManager>>>,
}

impl ProtocolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `manager`. A second manager with the same id is rejected.
    pub fn register(&self, manager: Arc<dyn ProtocolManager>) -> Result<(), LnnError> {
        let mut protocols = self.protocols.write();
        if protocols.iter().any(|p| p.id() == manager.id()) {
            warn!(protocol = %manager.id(), "Protocol already registered");
            return Err(LnnError::AlreadyRegistered(format!(
                "protocol {}",
                manager.id()
            )));
        }
        info!(
            protocol = %manager.id(),
            priority = manager.priority(),
            "Protocol registered"
        );
        protocols.push(manager);
        Ok(())
    }

    /// Walk protocols in order until `f` returns [`VisitControl::Stop`].
    ///
    /// The list is snapshotted first, so `f` may call back into the
    /// registry. Returns `false` if stopped early.
    pub fn visit<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&Arc<dyn ProtocolManager>) -> VisitControl,
    {
        let snapshot: Vec<_> = self.protocols.read().clone();
        for manager in &snapshot {
            if f(manager) == VisitControl::Stop {
                return false;
            }
        }
        true
    }

    /// Number of registered protocols.
    pub fn len(&self) -> usize {
        self.protocols.read().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.protocols.read().is_empty()
    }
}
