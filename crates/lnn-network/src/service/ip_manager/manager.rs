//! The IP protocol manager.

use super::{IpContext, IpSubnet};
use crate::domain::{NetifEntry, ProtocolManager, Subnet, SubnetTable, VisitControl};
use lnn_bus::{handler_fn, EventBus, EventHandler, LnnEvent, LnnEventType};
use lnn_types::{LnnError, NetifType, ProtocolType, NETIF_MASK_IP};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordering hint among transports.
const IP_PRIORITY: u8 = 10;

/// [`ProtocolManager`] for IP over Ethernet and WLAN.
pub struct IpProtocolManager {
    ctx: Arc<IpContext>,
    table: Arc<SubnetTable>,
    bus: Arc<EventBus>,
    handlers: Mutex<Vec<(LnnEventType, Arc<dyn EventHandler>)>>,
}

impl IpProtocolManager {
    /// Create the manager. Nothing is subscribed until [`init`](ProtocolManager::init).
    pub fn new(ctx: Arc<IpContext>, table: Arc<SubnetTable>, bus: Arc<EventBus>) -> Self {
        Self {
            ctx,
            table,
            bus,
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Shared collaborators.
    pub fn context(&self) -> &Arc<IpContext> {
        &self.ctx
    }

    fn subscribe(
        &self,
        event_type: LnnEventType,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), LnnError> {
        self.bus
            .register_handler(event_type, handler.clone())
            .map_err(|e| LnnError::OperationFailed(e.to_string()))?;
        self.handlers.lock().push((event_type, handler));
        Ok(())
    }
}

impl ProtocolManager for IpProtocolManager {
    fn id(&self) -> ProtocolType {
        ProtocolType::Ip
    }

    fn supported_netif_mask(&self) -> u32 {
        NETIF_MASK_IP
    }

    fn priority(&self) -> u8 {
        IP_PRIORITY
    }

    fn init(&self) -> Result<(), LnnError> {
        let table = self.table.clone();
        self.subscribe(
            LnnEventType::IpAddrChanged,
            handler_fn("ip-addr-changed", move |event| {
                if let LnnEvent::IpAddrChanged { if_name } = event {
                    table.notify_address_changed(if_name, ProtocolType::Ip);
                }
                Ok(())
            }),
        )?;

        let table = self.table.clone();
        let net = self.ctx.net.clone();
        self.subscribe(
            LnnEventType::WifiStateChanged,
            handler_fn("ip-wifi-state-changed", move |event| {
                let LnnEvent::WifiStateChanged { state } = event else {
                    return Ok(());
                };
                let mut wlan = Vec::new();
                table.visit(|subnet: &dyn Subnet| {
                    if subnet.protocol() == ProtocolType::Ip
                        && net.netif_type(subnet.if_name()) == Some(NetifType::Wlan)
                    {
                        wlan.push(subnet.if_name().to_string());
                    }
                    VisitControl::Continue
                });
                debug!(state = ?state, subnets = wlan.len(), "Wi-Fi state changed");
                for if_name in wlan {
                    table.notify_address_changed(&if_name, ProtocolType::Ip);
                }
                Ok(())
            }),
        )?;

        self.ctx.main_port.reset()?;
        self.ctx
            .discovery
            .link_status_changed(crate::ports::LinkStatus::Down, ProtocolType::Ip);
        info!("IP protocol initialised");
        Ok(())
    }

    fn deinit(&self) {
        for (event_type, handler) in self.handlers.lock().drain(..) {
            self.bus.unregister_handler(event_type, &handler);
        }
        let removed = self.table.unregister_by_protocol(ProtocolType::Ip);
        info!(subnets = removed, "IP protocol shut down");
    }

    fn enable(&self, netif: &NetifEntry) -> Result<(), LnnError> {
        if !self.supports(netif) {
            return Err(LnnError::InvalidArgument(format!(
                "IP cannot bind to {} interface {}",
                netif.netif_type, netif.if_name
            )));
        }
        let subnet = Arc::new(IpSubnet::new(netif.if_name.clone(), self.ctx.clone()));
        self.table.register(subnet)?;
        Ok(())
    }

    fn disable(&self, netif: &NetifEntry) -> Result<(), LnnError> {
        self.table.unregister(&netif.if_name, ProtocolType::Ip)
    }
}
