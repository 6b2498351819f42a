//! # TCP Listener Service
//!
//! Binds the auth, session and proxy ports on the main address with an
//! OS-assigned port each. Accepting connections belongs to the transport
//! layers above LNN; this adapter only owns the bound sockets.

use crate::ports::{CollaboratorError, Listener};
use parking_lot::Mutex;
use std::net::{IpAddr, SocketAddr, TcpListener};
use tracing::{debug, info};

/// [`Listener`] backed by `std::net::TcpListener`.
#[derive(Default)]
pub struct TcpListenerService {
    auth: Mutex<Option<TcpListener>>,
    session: Mutex<Option<TcpListener>>,
    proxy: Mutex<Option<TcpListener>>,
}

impl TcpListenerService {
    /// Create a service with nothing bound.
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(
        slot: &Mutex<Option<TcpListener>>,
        ip: IpAddr,
        which: &'static str,
    ) -> Result<u16, CollaboratorError> {
        let listener = TcpListener::bind(SocketAddr::new(ip, 0))?;
        let port = listener.local_addr()?.port();
        info!(listener = which, ip = %ip, port, "Listener bound");
        *slot.lock() = Some(listener);
        Ok(port)
    }

    fn unbind(slot: &Mutex<Option<TcpListener>>, which: &'static str) {
        if slot.lock().take().is_some() {
            debug!(listener = which, "Listener closed");
        }
    }
}

impl Listener for TcpListenerService {
    fn open_auth_server(&self, ip: IpAddr) -> Result<u16, CollaboratorError> {
        Self::bind(&self.auth, ip, "auth")
    }

    fn close_auth_server(&self) {
        Self::unbind(&self.auth, "auth");
    }

    fn start_session_listener(&self, ip: IpAddr) -> Result<u16, CollaboratorError> {
        Self::bind(&self.session, ip, "session")
    }

    fn stop_session_listener(&self) {
        Self::unbind(&self.session, "session");
    }

    fn start_proxy_listener(&self, ip: IpAddr) -> Result<u16, CollaboratorError> {
        Self::bind(&self.proxy, ip, "proxy")
    }

    fn stop_proxy_listener(&self) {
        Self::unbind(&self.proxy, "proxy");
    }
}
