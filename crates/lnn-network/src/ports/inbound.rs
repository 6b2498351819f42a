//! # Driving Ports (Inbound API)
//!
//! What the rest of the soft-bus stack calls.

use crate::domain::{NetifEntry, ProtocolManager, VisitControl};
use lnn_bus::{BusError, EventHandler, LnnEventType};
use lnn_types::{ConnectionAddrType, LnnError, ProtocolType};
use std::sync::Arc;

/// Network-management entry points.
pub trait LnnNetworkApi: Send + Sync {
    /// Add a transport. Duplicate protocol ids are rejected.
    fn register_protocol(&self, manager: Arc<dyn ProtocolManager>) -> Result<(), LnnError>;

    /// Walk managed interfaces. Returns `false` if stopped early.
    fn visit_netif(&self, f: &mut dyn FnMut(&NetifEntry) -> VisitControl) -> bool;

    /// Walk registered transports. Returns `false` if stopped early.
    fn visit_protocol(
        &self,
        f: &mut dyn FnMut(&Arc<dyn ProtocolManager>) -> VisitControl,
    ) -> bool;

    /// Re-evaluate the `protocol` subnet on `if_name`.
    fn notify_physical_subnet_address_changed(&self, if_name: &str, protocol: ProtocolType);

    /// The mesh lost every peer on `addr_type` (`None` for all types).
    fn notify_all_type_offline(&self, addr_type: Option<ConnectionAddrType>);

    /// Subscribe to bus events.
    fn register_event_handler(
        &self,
        event_type: LnnEventType,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), BusError>;

    /// Unsubscribe from bus events.
    fn unregister_event_handler(&self, event_type: LnnEventType, handler: &Arc<dyn EventHandler>);
}
