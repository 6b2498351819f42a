//! # LNN Runtime
//!
//! Wires the LNN crates into a running service.
//!
//! ## Startup Sequence
//!
//! 1. Seed the node ledger with the configured identity
//! 2. Build the IP transport over the supplied collaborators
//! 3. Register it with the network manager and run `init`, which enables
//!    it on every configured Ethernet/WLAN interface
//! 4. Start the interface monitors under supervision
//!
//! Shutdown runs the same steps backwards.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;

pub use config::{DeviceConfig, RuntimeConfig};

use config::random_id;
use lnn_bus::EventBus;
use lnn_crypto::SessionKeyStore;
use lnn_exchange::DeviceInfoExchange;
use lnn_network::domain::MainPort;
use lnn_network::{
    start_monitors, ConfigError, Discovery, IpContext, IpProtocolManager, Listener,
    LnnNetworkApi, MeshLeaver, MonitorError, MonitorHandle, MonitorHealth, NetQuery,
    NetworkManager, NotificationSource,
};
use lnn_types::{LnnError, NodeLedger, NumKey, ProtocolMask, ProtocolType, StrKey};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop the runtime from starting.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration could not be used.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// Ledger seeding or protocol setup failed.
    #[error("initialisation: {0}")]
    Init(#[from] LnnError),

    /// A required interface monitor did not start.
    #[error("monitor: {0}")]
    Monitor(#[from] MonitorError),
}

/// External services the runtime is wired to.
pub struct Collaborators {
    /// Local node attributes.
    pub ledger: Arc<dyn NodeLedger>,
    /// OS network queries.
    pub net: Arc<dyn NetQuery>,
    /// Port listeners.
    pub listener: Arc<dyn Listener>,
    /// Discovery and publish.
    pub discovery: Arc<dyn Discovery>,
    /// Mesh layer.
    pub mesh: Arc<dyn MeshLeaver>,
    /// Interface monitors, started in order.
    pub sources: Vec<Box<dyn NotificationSource>>,
}

#[cfg(target_os = "linux")]
impl Collaborators {
    /// Host adapters: getifaddrs queries, TCP listeners, a netlink monitor
    /// and log-only discovery and mesh services.
    pub fn host(netifs: lnn_network::NetifList) -> Self {
        use lnn_network::adapters::{
            LoggingDiscovery, LoggingMeshLeaver, NetlinkMonitor, OsNetQuery, TcpListenerService,
        };
        Self {
            ledger: Arc::new(lnn_types::InMemoryNodeLedger::new()),
            net: Arc::new(OsNetQuery::new(netifs)),
            listener: Arc::new(TcpListenerService::new()),
            discovery: Arc::new(LoggingDiscovery::new()),
            mesh: Arc::new(LoggingMeshLeaver),
            sources: vec![Box::new(NetlinkMonitor::new()) as Box<dyn NotificationSource>],
        }
    }
}

/// A started LNN service.
pub struct LnnRuntime {
    manager: NetworkManager,
    exchange: DeviceInfoExchange,
    session_keys: Arc<SessionKeyStore>,
    main_port: Arc<MainPort>,
    monitors: Vec<MonitorHandle>,
}

impl LnnRuntime {
    /// Wire and start everything.
    pub fn start(config: RuntimeConfig, collab: Collaborators) -> Result<Self, RuntimeError> {
        seed_ledger(&*collab.ledger, &config.device)?;

        let bus = Arc::new(EventBus::new());
        let manager = NetworkManager::new(config.network.netifs()?, bus.clone());

        let main_port = Arc::new(MainPort::new(collab.ledger.clone()));
        let ip_ctx = Arc::new(IpContext {
            ledger: collab.ledger.clone(),
            main_port: main_port.clone(),
            net: collab.net.clone(),
            listener: collab.listener,
            discovery: collab.discovery,
            mesh: collab.mesh,
            auto_networking: config.network.network.auto_networking,
        });
        let ip = IpProtocolManager::new(ip_ctx, manager.table().clone(), bus.clone());
        manager.register_protocol(Arc::new(ip))?;
        manager.init()?;

        let monitors = match start_monitors(
            collab.sources,
            &config.network.monitor,
            collab.net,
            bus,
        ) {
            Ok(monitors) => monitors,
            Err(e) => {
                manager.deinit();
                return Err(e.into());
            }
        };

        let session_keys = Arc::new(SessionKeyStore::new());
        let exchange = DeviceInfoExchange::new(collab.ledger, session_keys.clone());

        info!(
            subnets = manager.table().len(),
            monitors = monitors.len(),
            "LNN runtime started"
        );
        Ok(Self {
            manager,
            exchange,
            session_keys,
            main_port,
            monitors,
        })
    }

    /// Network-management API for the rest of the soft bus.
    pub fn manager(&self) -> &NetworkManager {
        &self.manager
    }

    /// Descriptor exchange for peer handshakes.
    pub fn exchange(&self) -> &DeviceInfoExchange {
        &self.exchange
    }

    /// Where authentication deposits negotiated session keys.
    pub fn session_keys(&self) -> &Arc<SessionKeyStore> {
        &self.session_keys
    }

    /// Interface currently holding the main port, if any.
    pub fn main_interface(&self) -> Option<String> {
        self.main_port.holder()
    }

    /// Health of every monitor, in start order.
    pub fn monitor_health(&self) -> Vec<(String, MonitorHealth)> {
        self.monitors
            .iter()
            .map(|m| (m.name().to_string(), m.health()))
            .collect()
    }

    /// Stop monitors and tear down every subnet.
    ///
    /// Monitor threads parked in a blocking read are not joined; they end
    /// with the process.
    pub fn shutdown(self) {
        for monitor in &self.monitors {
            monitor.stop();
        }
        self.manager.deinit();
        for (name, health) in self.monitor_health() {
            if health == MonitorHealth::Failed {
                warn!(monitor = %name, "Monitor had failed before shutdown");
            }
        }
        info!("LNN runtime stopped");
    }
}

fn seed_ledger(ledger: &dyn NodeLedger, device: &DeviceConfig) -> Result<(), LnnError> {
    let udid = device.udid.clone().unwrap_or_else(random_id);
    let network_id = device.network_id.clone().unwrap_or_else(random_id);

    ledger.set_str(StrKey::DeviceName, &device.name)?;
    ledger.set_str(StrKey::DeviceUdid, &udid)?;
    ledger.set_str(StrKey::NetworkId, &network_id)?;
    ledger.set_str(StrKey::SoftbusVersion, env!("CARGO_PKG_VERSION"))?;
    ledger.set_num(NumKey::DeviceTypeId, i64::from(device.device_type_id))?;

    let protocols = ProtocolMask::NONE.with(ProtocolType::Ip);
    // Bit masks stay well below i64::MAX.
    ledger.set_num(NumKey::TransportProtocols, protocols.bits() as i64)?;

    info!(name = %device.name, udid = %udid, "Local identity seeded");
    Ok(())
}
