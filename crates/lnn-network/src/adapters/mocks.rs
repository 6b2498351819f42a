//! Recording test doubles for every collaborator port.
//!
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```ignore
//! use lnn_network::adapters::mocks::StaticNetQuery;
//! use lnn_network::ports::NetQuery;
//! use lnn_types::NetifType;
//!
//! let net = StaticNetQuery::new().with_netif("wlan0", NetifType::Wlan, 3);
//! net.set_ip("wlan0", "192.168.1.5".parse().unwrap());
//! assert!(net.available_ip("wlan0").is_ok());
//! ```

use crate::monitor::{MonitorError, NotificationSource, RawNotification};
use crate::ports::{CollaboratorError, Discovery, LinkStatus, Listener, MeshLeaver, NetQuery};
use lnn_types::{ConnectionAddrType, NetifType, ProtocolType};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

// =============================================================================
// NetQuery
// =============================================================================

/// Network query answered from in-memory tables.
#[derive(Default)]
pub struct StaticNetQuery {
    addresses: Mutex<HashMap<String, IpAddr>>,
    indices: Mutex<HashMap<u32, String>>,
    types: Mutex<HashMap<String, NetifType>>,
}

impl StaticNetQuery {
    /// Create an empty query with no interfaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interface with its kernel index.
    pub fn with_netif(self, if_name: &str, netif_type: NetifType, index: u32) -> Self {
        self.indices.lock().insert(index, if_name.to_string());
        self.types.lock().insert(if_name.to_string(), netif_type);
        self
    }

    /// Give `if_name` an address.
    pub fn set_ip(&self, if_name: &str, ip: IpAddr) {
        self.addresses.lock().insert(if_name.to_string(), ip);
    }

    /// Remove the address of `if_name`.
    pub fn clear_ip(&self, if_name: &str) {
        self.addresses.lock().remove(if_name);
    }
}

impl NetQuery for StaticNetQuery {
    fn available_ip(&self, if_name: &str) -> Result<IpAddr, CollaboratorError> {
        self.addresses
            .lock()
            .get(if_name)
            .copied()
            .ok_or_else(|| CollaboratorError::Unavailable(format!("no address on {if_name}")))
    }

    fn if_name_by_index(&self, index: u32) -> Option<String> {
        self.indices.lock().get(&index).cloned()
    }

    fn netif_type(&self, if_name: &str) -> Option<NetifType> {
        self.types.lock().get(if_name).copied()
    }
}

// =============================================================================
// Discovery
// =============================================================================

#[derive(Debug, Default)]
struct DiscoveryState {
    publishing: bool,
    discovering: bool,
    link_up: usize,
    link_down: usize,
}

/// Discovery service that records every call.
#[derive(Debug, Default)]
pub struct RecordingDiscovery {
    state: Mutex<DiscoveryState>,
}

impl RecordingDiscovery {
    /// Create a recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `LinkStatus::Up` reports.
    pub fn link_ups(&self) -> usize {
        self.state.lock().link_up
    }

    /// Number of `LinkStatus::Down` reports.
    pub fn link_downs(&self) -> usize {
        self.state.lock().link_down
    }

    /// Whether publish is active.
    pub fn is_publishing(&self) -> bool {
        self.state.lock().publishing
    }

    /// Whether discovery is active.
    pub fn is_discovering(&self) -> bool {
        self.state.lock().discovering
    }
}

impl Discovery for RecordingDiscovery {
    fn start_publish(&self) -> Result<(), CollaboratorError> {
        self.state.lock().publishing = true;
        Ok(())
    }

    fn stop_publish(&self) -> Result<(), CollaboratorError> {
        self.state.lock().publishing = false;
        Ok(())
    }

    fn start_discovery(&self) -> Result<(), CollaboratorError> {
        self.state.lock().discovering = true;
        Ok(())
    }

    fn stop_discovery(&self) -> Result<(), CollaboratorError> {
        self.state.lock().discovering = false;
        Ok(())
    }

    fn link_status_changed(&self, status: LinkStatus, _transport: ProtocolType) {
        let mut state = self.state.lock();
        match status {
            LinkStatus::Up => state.link_up += 1,
            LinkStatus::Down => state.link_down += 1,
        }
    }
}

// =============================================================================
// Listener
// =============================================================================

/// Listener port kinds, for scripting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// Authentication server.
    Auth,
    /// Session listener.
    Session,
    /// Proxy listener.
    Proxy,
}

#[derive(Debug, Default)]
struct ListenerState {
    open: Vec<PortKind>,
    log: Vec<String>,
    fail: Option<PortKind>,
    next_port: u16,
}

/// Listener service that hands out fake ports and records calls.
#[derive(Debug, Default)]
pub struct RecordingListener {
    state: Mutex<ListenerState>,
}

impl RecordingListener {
    /// Create a recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every open of `kind` fail until cleared with `None`.
    pub fn fail_on(&self, kind: Option<PortKind>) {
        self.state.lock().fail = kind;
    }

    /// Ports currently open.
    pub fn open_ports(&self) -> Vec<PortKind> {
        self.state.lock().open.clone()
    }

    /// Every call, in order, e.g. `"open auth"` or `"close proxy"`.
    pub fn log(&self) -> Vec<String> {
        self.state.lock().log.clone()
    }

    fn open(&self, kind: PortKind) -> Result<u16, CollaboratorError> {
        let mut state = self.state.lock();
        state.log.push(format!("open {kind:?}").to_lowercase());
        if state.fail == Some(kind) {
            return Err(CollaboratorError::Io(format!("{kind:?} bind failed")));
        }
        state.next_port += 1;
        state.open.push(kind);
        Ok(40_000 + state.next_port)
    }

    fn close(&self, kind: PortKind) {
        let mut state = self.state.lock();
        state.log.push(format!("close {kind:?}").to_lowercase());
        state.open.retain(|k| *k != kind);
    }
}

impl Listener for RecordingListener {
    fn open_auth_server(&self, _ip: IpAddr) -> Result<u16, CollaboratorError> {
        self.open(PortKind::Auth)
    }

    fn close_auth_server(&self) {
        self.close(PortKind::Auth);
    }

    fn start_session_listener(&self, _ip: IpAddr) -> Result<u16, CollaboratorError> {
        self.open(PortKind::Session)
    }

    fn stop_session_listener(&self) {
        self.close(PortKind::Session);
    }

    fn start_proxy_listener(&self, _ip: IpAddr) -> Result<u16, CollaboratorError> {
        self.open(PortKind::Proxy)
    }

    fn stop_proxy_listener(&self) {
        self.close(PortKind::Proxy);
    }
}

// =============================================================================
// MeshLeaver
// =============================================================================

/// Mesh layer that records leave requests.
#[derive(Debug, Default)]
pub struct RecordingMeshLeaver {
    requests: Mutex<Vec<Vec<ConnectionAddrType>>>,
}

impl RecordingMeshLeaver {
    /// Create a recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request, in order.
    pub fn requests(&self) -> Vec<Vec<ConnectionAddrType>> {
        self.requests.lock().clone()
    }
}

impl MeshLeaver for RecordingMeshLeaver {
    fn request_leave_by_addr_type(
        &self,
        addr_types: &[ConnectionAddrType],
    ) -> Result<(), CollaboratorError> {
        self.requests.lock().push(addr_types.to_vec());
        Ok(())
    }
}

// =============================================================================
// NotificationSource
// =============================================================================

/// Notification source that replays a script, then reports `Closed`.
pub struct ScriptedSource {
    name: String,
    required: bool,
    opens: Arc<AtomicU32>,
    open_results: VecDeque<Result<(), MonitorError>>,
    batches: VecDeque<Result<Vec<RawNotification>, MonitorError>>,
}

impl ScriptedSource {
    /// Create a required source with an empty script.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            required: true,
            opens: Arc::new(AtomicU32::new(0)),
            open_results: VecDeque::new(),
            batches: VecDeque::new(),
        }
    }

    /// Mark the source optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Queue the result of the next `open` call. Unscripted opens succeed.
    pub fn then_open(mut self, result: Result<(), MonitorError>) -> Self {
        self.open_results.push_back(result);
        self
    }

    /// Queue the result of the next `next_batch` call.
    pub fn then_batch(mut self, result: Result<Vec<RawNotification>, MonitorError>) -> Self {
        self.batches.push_back(result);
        self
    }

    /// Counter of `open` calls, shared with the caller.
    pub fn open_counter(&self) -> Arc<AtomicU32> {
        self.opens.clone()
    }
}

impl NotificationSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn required(&self) -> bool {
        self.required
    }

    fn open(&mut self) -> Result<(), MonitorError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.open_results.pop_front().unwrap_or(Ok(()))
    }

    fn next_batch(&mut self) -> Result<Vec<RawNotification>, MonitorError> {
        self.batches
            .pop_front()
            .unwrap_or(Err(MonitorError::Closed))
    }
}
