//! # Driven Ports (Outbound SPI)
//!
//! Collaborators the host must provide. Every call is synchronous and may
//! take arbitrarily long from this crate's point of view.

use lnn_types::{ConnectionAddrType, NetifType, ProtocolType};
use std::net::IpAddr;
use thiserror::Error;

/// Errors returned by collaborator ports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The collaborator or the queried resource does not exist.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// An OS call failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The collaborator refused the request.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for CollaboratorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// OS network queries.
pub trait NetQuery: Send + Sync {
    /// Current non-loopback address of `if_name`.
    fn available_ip(&self, if_name: &str) -> Result<IpAddr, CollaboratorError>;

    /// Kernel interface name for `index`.
    fn if_name_by_index(&self, index: u32) -> Option<String>;

    /// Coarse kind of `if_name`.
    fn netif_type(&self, if_name: &str) -> Option<NetifType>;

    /// Mesh address type of `if_name`.
    fn addr_type(&self, if_name: &str) -> Option<ConnectionAddrType> {
        self.netif_type(if_name).map(NetifType::addr_type)
    }
}

/// Link state reported to discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Transport usable.
    Up,
    /// Transport gone.
    Down,
}

/// Discovery and publish service.
pub trait Discovery: Send + Sync {
    /// Start advertising the local device.
    fn start_publish(&self) -> Result<(), CollaboratorError>;

    /// Stop advertising.
    fn stop_publish(&self) -> Result<(), CollaboratorError>;

    /// Start looking for peers.
    fn start_discovery(&self) -> Result<(), CollaboratorError>;

    /// Stop looking for peers.
    fn stop_discovery(&self) -> Result<(), CollaboratorError>;

    /// A transport went up or down.
    fn link_status_changed(&self, status: LinkStatus, transport: ProtocolType);
}

/// Listener service for the three IP ports.
///
/// `open_*`/`start_*` return the bound port.
pub trait Listener: Send + Sync {
    /// Open the authentication server on `ip`.
    fn open_auth_server(&self, ip: IpAddr) -> Result<u16, CollaboratorError>;

    /// Close the authentication server.
    fn close_auth_server(&self);

    /// Start the session listener on `ip`.
    fn start_session_listener(&self, ip: IpAddr) -> Result<u16, CollaboratorError>;

    /// Stop the session listener.
    fn stop_session_listener(&self);

    /// Start the proxy listener on `ip`.
    fn start_proxy_listener(&self, ip: IpAddr) -> Result<u16, CollaboratorError>;

    /// Stop the proxy listener.
    fn stop_proxy_listener(&self);
}

/// The mesh layer above LNN.
pub trait MeshLeaver: Send + Sync {
    /// Drop every peer reached through any of `addr_types`.
    fn request_leave_by_addr_type(
        &self,
        addr_types: &[ConnectionAddrType],
    ) -> Result<(), CollaboratorError>;
}
