//! A full network stack over recording collaborators.

use lnn_bus::EventBus;
use lnn_network::adapters::mocks::{
    RecordingDiscovery, RecordingListener, RecordingMeshLeaver, ScriptedSource, StaticNetQuery,
};
use lnn_network::config::parse_netif_names;
use lnn_network::monitor::{NotificationKind, RawNotification};
use lnn_network::{
    start_monitors, IpContext, IpProtocolManager, LnnNetworkApi, MainPort, MonitorConfig,
    MonitorHealth, NetifList, NetworkManager, NotificationSource, SubnetStatus, VisitControl,
};
use lnn_types::{InMemoryNodeLedger, NetifType};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

/// Kernel index of a Bluetooth interface the stack does not manage.
pub const BT_INDEX: u32 = 40;

pub struct Stack {
    pub manager: NetworkManager,
    pub net: Arc<StaticNetQuery>,
    pub listener: Arc<RecordingListener>,
    pub discovery: Arc<RecordingDiscovery>,
    pub mesh: Arc<RecordingMeshLeaver>,
    pub ledger: Arc<InMemoryNodeLedger>,
    pub main_port: Arc<MainPort>,
    pub bus: Arc<EventBus>,
}

impl Stack {
    /// Start a stack managing `netif_names` (`"<type>:<name>,..."`).
    ///
    /// Interfaces get kernel indices 2, 3, ... in configuration order, and
    /// `bt0` is known to the OS at [`BT_INDEX`].
    pub fn start(netif_names: &str) -> Self {
        let entries = parse_netif_names(netif_names).unwrap();
        let mut net = StaticNetQuery::new().with_netif("bt0", NetifType::Br, BT_INDEX);
        for (index, entry) in (2u32..).zip(&entries) {
            net = net.with_netif(&entry.if_name, entry.netif_type, index);
        }
        let net = Arc::new(net);

        let listener = Arc::new(RecordingListener::new());
        let discovery = Arc::new(RecordingDiscovery::new());
        let mesh = Arc::new(RecordingMeshLeaver::new());
        let ledger = Arc::new(InMemoryNodeLedger::new());
        let main_port = Arc::new(MainPort::new(ledger.clone()));
        let bus = Arc::new(EventBus::new());

        let manager = NetworkManager::new(NetifList::new(entries), bus.clone());
        let ctx = Arc::new(IpContext {
            ledger: ledger.clone(),
            main_port: main_port.clone(),
            net: net.clone(),
            listener: listener.clone(),
            discovery: discovery.clone(),
            mesh: mesh.clone(),
            auto_networking: true,
        });
        let ip = IpProtocolManager::new(ctx, manager.table().clone(), bus.clone());
        manager.register_protocol(Arc::new(ip)).unwrap();
        manager.init().unwrap();

        Self {
            manager,
            net,
            listener,
            discovery,
            mesh,
            ledger,
            main_port,
            bus,
        }
    }

    /// Status of the subnet bound to `if_name`.
    pub fn status(&self, if_name: &str) -> Option<SubnetStatus> {
        let mut found = None;
        self.manager.table().visit(|s| {
            if s.if_name() == if_name {
                found = Some(s.status());
                return VisitControl::Stop;
            }
            VisitControl::Continue
        });
        found
    }

    /// Interfaces whose subnet is `Running`.
    pub fn running(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.manager.table().visit(|s| {
            if s.status() == SubnetStatus::Running {
                names.push(s.if_name().to_string());
            }
            VisitControl::Continue
        });
        names
    }

    /// Feed one batch of kernel notifications through a supervised
    /// monitor and wait until it has been fully dispatched.
    pub fn replay(&self, batch: Vec<RawNotification>) {
        // The script reports `Closed` once the batch is out.
        let source = ScriptedSource::new("replay").then_batch(Ok(batch));
        let handles = start_monitors(
            vec![Box::new(source) as Box<dyn NotificationSource>],
            &MonitorConfig::default(),
            self.net.clone(),
            self.bus.clone(),
        )
        .unwrap();
        for handle in handles {
            assert_eq!(handle.join(), MonitorHealth::Stopped);
        }
    }
}

pub fn ip(last: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(192, 168, 1, last))
}

pub fn address_added(if_index: u32) -> RawNotification {
    RawNotification {
        kind: NotificationKind::AddressAdded,
        if_index,
        if_name: None,
    }
}

pub fn address_removed(if_index: u32) -> RawNotification {
    RawNotification {
        kind: NotificationKind::AddressRemoved,
        if_index,
        if_name: None,
    }
}
