//! # Transport Protocols
//!
//! One [`ProtocolManager`] per transport kind, registered once per process.

use crate::domain::NetifEntry;
use lnn_types::{LnnError, ProtocolType};

/// Return value of visitor callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    /// Keep walking.
    Continue,
    /// Stop after this item.
    Stop,
}

/// A pluggable transport.
pub trait ProtocolManager: Send + Sync {
    /// Protocol bit identifying this transport.
    fn id(&self) -> ProtocolType;

    /// Interface kinds this transport can bind to, as a `NetifType` mask.
    fn supported_netif_mask(&self) -> u32;

    /// Ordering hint; lower runs first.
    fn priority(&self) -> u8;

    /// One-time setup before any interface is enabled.
    fn init(&self) -> Result<(), LnnError>;

    /// Process teardown. Drops every subnet this transport owns.
    fn deinit(&self);

    /// Bind this transport to `netif`.
    fn enable(&self, netif: &NetifEntry) -> Result<(), LnnError>;

    /// Unbind this transport from `netif`.
    fn disable(&self, netif: &NetifEntry) -> Result<(), LnnError>;

    /// Whether `netif` is a kind this transport binds to.
    fn supports(&self, netif: &NetifEntry) -> bool {
        netif.netif_type.in_mask(self.supported_netif_mask())
    }
}
