//! Collaborators shared by every IP subnet, and the link sequences built
//! on them.

use crate::domain::MainPort;
use crate::ports::{CollaboratorError, Discovery, LinkStatus, Listener, MeshLeaver, NetQuery};
use lnn_types::{ConnectionAddrType, NodeLedger, NumKey, ProtocolType};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything an IP subnet talks to.
pub struct IpContext {
    /// Local node attributes.
    pub ledger: Arc<dyn NodeLedger>,
    /// Single main-port claim.
    pub main_port: Arc<MainPort>,
    /// OS network queries.
    pub net: Arc<dyn NetQuery>,
    /// Port listeners.
    pub listener: Arc<dyn Listener>,
    /// Discovery and publish.
    pub discovery: Arc<dyn Discovery>,
    /// Mesh layer.
    pub mesh: Arc<dyn MeshLeaver>,
    /// Start discovery, not just publish, when a subnet comes up.
    pub auto_networking: bool,
}

impl IpContext {
    fn record_port(&self, key: NumKey, port: u16) {
        if let Err(e) = self.ledger.set_num(key, i64::from(port)) {
            warn!(key = ?key, error = %e, "Ledger port update failed");
        }
    }

    /// Open auth, session and proxy listeners on `ip`.
    ///
    /// On failure the listeners already opened are closed again.
    pub(crate) fn open_ip_link(&self, ip: IpAddr) -> Result<(), CollaboratorError> {
        let auth = self.listener.open_auth_server(ip)?;
        self.record_port(NumKey::AuthPort, auth);

        let session = match self.listener.start_session_listener(ip) {
            Ok(port) => port,
            Err(e) => {
                self.close_auth();
                return Err(e);
            }
        };
        self.record_port(NumKey::SessionPort, session);

        let proxy = match self.listener.start_proxy_listener(ip) {
            Ok(port) => port,
            Err(e) => {
                self.close_session();
                self.close_auth();
                return Err(e);
            }
        };
        self.record_port(NumKey::ProxyPort, proxy);

        debug!(ip = %ip, auth, session, proxy, "IP link open");
        Ok(())
    }

    /// Close the three listeners, reverse of opening.
    pub(crate) fn close_ip_link(&self) {
        self.listener.stop_proxy_listener();
        self.record_port(NumKey::ProxyPort, 0);
        self.close_session();
        self.close_auth();
        debug!("IP link closed");
    }

    fn close_session(&self) {
        self.listener.stop_session_listener();
        self.record_port(NumKey::SessionPort, 0);
    }

    fn close_auth(&self) {
        self.listener.close_auth_server();
        self.record_port(NumKey::AuthPort, 0);
    }

    /// Signal link-up and start advertising.
    pub(crate) fn start_discovery(&self) {
        self.discovery
            .link_status_changed(LinkStatus::Up, ProtocolType::Ip);
        if let Err(e) = self.discovery.start_publish() {
            warn!(error = %e, "Start publish failed");
        }
        if self.auto_networking {
            if let Err(e) = self.discovery.start_discovery() {
                warn!(error = %e, "Start discovery failed");
            }
        } else {
            debug!("Auto networking disabled, discovery not started");
        }
    }

    /// Stop advertising and signal link-down.
    pub(crate) fn stop_discovery(&self) {
        if let Err(e) = self.discovery.stop_publish() {
            warn!(error = %e, "Stop publish failed");
        }
        if let Err(e) = self.discovery.stop_discovery() {
            warn!(error = %e, "Stop discovery failed");
        }
        self.discovery
            .link_status_changed(LinkStatus::Down, ProtocolType::Ip);
    }

    /// Ask the mesh to drop peers reached through `if_name`.
    ///
    /// Unknown interfaces leave every IP address type.
    pub(crate) fn leave_old_network(&self, if_name: &str) {
        let addr_types = match self.net.addr_type(if_name) {
            Some(addr_type) => vec![addr_type],
            None => ConnectionAddrType::IP_FALLBACK.to_vec(),
        };
        if let Err(e) = self.mesh.request_leave_by_addr_type(&addr_types) {
            warn!(if_name, error = %e, "Leave request failed");
        }
    }
}
