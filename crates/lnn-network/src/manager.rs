//! # Network Manager
//!
//! Facade over the protocol registry, the subnet table and the event bus.
//! This is what the rest of the soft-bus stack holds.
//!
//! ## Lifecycle
//!
//! 1. Build with the configured interface list and a shared bus.
//! 2. [`register_protocol`](LnnNetworkApi::register_protocol) each transport.
//! 3. [`init`](NetworkManager::init) initialises transports by priority and
//!    enables each one on every matching interface.
//! 4. [`deinit`](NetworkManager::deinit) reverses step 3.

use crate::domain::{
    NetifEntry, NetifList, ProtocolManager, ProtocolRegistry, SubnetTable, VisitControl,
};
use crate::ports::LnnNetworkApi;
use lnn_bus::{handler_fn, BusError, EventBus, EventHandler, LnnEvent, LnnEventType};
use lnn_types::{ConnectionAddrType, LnnError, ProtocolType};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owner of the network-management state.
pub struct NetworkManager {
    netifs: Arc<NetifList>,
    bus: Arc<EventBus>,
    table: Arc<SubnetTable>,
    registry: ProtocolRegistry,
    online_handler: Mutex<Option<Arc<dyn EventHandler>>>,
}

impl NetworkManager {
    /// Create a manager for `netifs` with an empty subnet table.
    pub fn new(netifs: NetifList, bus: Arc<EventBus>) -> Self {
        Self {
            netifs: Arc::new(netifs),
            bus,
            table: Arc::new(SubnetTable::new()),
            registry: ProtocolRegistry::new(),
            online_handler: Mutex::new(None),
        }
    }

    /// Subnet table shared with protocol managers.
    pub fn table(&self) -> &Arc<SubnetTable> {
        &self.table
    }

    /// Event bus shared with protocol managers and monitors.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Configured interfaces.
    pub fn netifs(&self) -> &NetifList {
        &self.netifs
    }

    fn by_priority(&self) -> Vec<Arc<dyn ProtocolManager>> {
        let mut protocols = Vec::with_capacity(self.registry.len());
        self.registry.visit(|p| {
            protocols.push(p.clone());
            VisitControl::Continue
        });
        // Stable: equal priorities keep registration order.
        protocols.sort_by_key(|p| p.priority());
        protocols
    }

    /// Initialise every registered transport and enable it on each
    /// configured interface it supports.
    ///
    /// A transport whose `init` fails aborts startup. Per-interface enable
    /// failures are logged and skipped.
    pub fn init(&self) -> Result<(), LnnError> {
        let protocols = self.by_priority();
        for protocol in &protocols {
            protocol.init().map_err(|e| {
                warn!(protocol = %protocol.id(), error = %e, "Protocol init failed");
                e
            })?;
        }

        for protocol in &protocols {
            for netif in self.netifs.iter().filter(|n| protocol.supports(n)) {
                match protocol.enable(netif) {
                    Ok(()) => debug!(
                        protocol = %protocol.id(),
                        if_name = %netif.if_name,
                        "Protocol enabled"
                    ),
                    Err(e) => warn!(
                        protocol = %protocol.id(),
                        if_name = %netif.if_name,
                        error = %e,
                        "Protocol enable failed"
                    ),
                }
            }
        }

        self.subscribe_node_online()?;
        info!(
            protocols = protocols.len(),
            netifs = self.netifs.len(),
            subnets = self.table.len(),
            "Network manager initialised"
        );
        Ok(())
    }

    /// Unsubscribe and deinitialise transports in reverse priority order.
    pub fn deinit(&self) {
        if let Some(handler) = self.online_handler.lock().take() {
            self.bus
                .unregister_handler(LnnEventType::NodeOnlineStateChanged, &handler);
        }
        for protocol in self.by_priority().iter().rev() {
            protocol.deinit();
        }
        info!("Network manager shut down");
    }

    fn subscribe_node_online(&self) -> Result<(), LnnError> {
        let table = self.table.clone();
        let netifs = self.netifs.clone();
        let handler: Arc<dyn EventHandler> = handler_fn("lnn-node-online", move |event| {
            let LnnEvent::NodeOnlineStateChanged {
                is_online,
                addr_type,
                online_count,
                ..
            } = event
            else {
                return Ok(());
            };
            if *is_online || *online_count > 0 {
                return Ok(());
            }
            info!(addr_type = ?addr_type, "Last peer offline");
            table.notify_all_disconnected_by_addr_type(Some(*addr_type), |name| {
                netifs.addr_type_by_if_name(name)
            });
            Ok(())
        });

        self.bus
            .register_handler(LnnEventType::NodeOnlineStateChanged, handler.clone())
            .map_err(|e| LnnError::OperationFailed(e.to_string()))?;
        *self.online_handler.lock() = Some(handler);
        Ok(())
    }
}

impl LnnNetworkApi for NetworkManager {
    fn register_protocol(&self, manager: Arc<dyn ProtocolManager>) -> Result<(), LnnError> {
        self.registry.register(manager)
    }

    fn visit_netif(&self, f: &mut dyn FnMut(&NetifEntry) -> VisitControl) -> bool {
        self.netifs.visit(f)
    }

    fn visit_protocol(
        &self,
        f: &mut dyn FnMut(&Arc<dyn ProtocolManager>) -> VisitControl,
    ) -> bool {
        self.registry.visit(f)
    }

    fn notify_physical_subnet_address_changed(&self, if_name: &str, protocol: ProtocolType) {
        let matched = self.table.notify_address_changed(if_name, protocol);
        if matched == 0 {
            debug!(if_name, protocol = %protocol, "No subnet to notify");
        }
    }

    fn notify_all_type_offline(&self, addr_type: Option<ConnectionAddrType>) {
        let netifs = self.netifs.clone();
        self.table
            .notify_all_disconnected_by_addr_type(addr_type, |name| {
                netifs.addr_type_by_if_name(name)
            });
    }

    fn register_event_handler(
        &self,
        event_type: LnnEventType,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), BusError> {
        self.bus.register_handler(event_type, handler)
    }

    fn unregister_event_handler(&self, event_type: LnnEventType, handler: &Arc<dyn EventHandler>) {
        self.bus.unregister_handler(event_type, handler);
    }
}
