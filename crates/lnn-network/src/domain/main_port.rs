//! # Main Port
//!
//! At most one interface holds the main IP address/interface pair. The
//! claim lives behind its own lock and is mirrored into the node ledger
//! (`NetIfName`, `WlanIp`) on every change.

use lnn_types::{LnnError, NodeLedger, StrKey, LOOPBACK_IFNAME, LOOPBACK_IP};
use parking_lot::Mutex;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::{debug, warn};

/// Point-in-time copy of the main pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainPortSnapshot {
    /// Interface holding main, or the loopback placeholder.
    pub if_name: String,
    /// Address of that interface, or the loopback sentinel.
    pub ip: IpAddr,
}

impl MainPortSnapshot {
    /// The unclaimed placeholder pair.
    pub fn loopback() -> Self {
        Self {
            if_name: LOOPBACK_IFNAME.to_string(),
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }

    /// Whether nobody holds main.
    pub fn is_loopback(&self) -> bool {
        self.if_name == LOOPBACK_IFNAME || self.ip.is_loopback()
    }
}

/// Guard for the single main-port claim.
pub struct MainPort {
    state: Mutex<MainPortSnapshot>,
    ledger: Arc<dyn NodeLedger>,
}

impl MainPort {
    /// Create an unclaimed main port. The ledger is not touched until
    /// [`reset`](Self::reset) or a claim.
    pub fn new(ledger: Arc<dyn NodeLedger>) -> Self {
        Self {
            state: Mutex::new(MainPortSnapshot::loopback()),
            ledger,
        }
    }

    /// Current pair.
    pub fn snapshot(&self) -> MainPortSnapshot {
        self.state.lock().clone()
    }

    /// Interface holding main, `None` while unclaimed.
    pub fn holder(&self) -> Option<String> {
        let state = self.state.lock();
        (!state.is_loopback()).then(|| state.if_name.clone())
    }

    /// Drop any claim and write the loopback pair to the ledger.
    pub fn reset(&self) -> Result<(), LnnError> {
        let mut state = self.state.lock();
        Self::publish(&*self.ledger, LOOPBACK_IFNAME, LOOPBACK_IP)?;
        *state = MainPortSnapshot::loopback();
        Ok(())
    }

    /// Claim main for `if_name` at `ip`.
    ///
    /// Fails for the loopback placeholder, for loopback addresses, and when
    /// a different interface already holds the claim. Re-claiming by the
    /// current holder updates the address.
    pub fn request(&self, if_name: &str, ip: IpAddr) -> Result<(), LnnError> {
        if if_name == LOOPBACK_IFNAME || ip.is_loopback() {
            return Err(LnnError::InvalidArgument(format!(
                "loopback pair {if_name}/{ip} cannot hold main"
            )));
        }

        let mut state = self.state.lock();
        if !state.is_loopback() && state.if_name != if_name {
            warn!(
                candidate = if_name,
                holder = %state.if_name,
                "Only one interface may hold main"
            );
            return Err(LnnError::AlreadyRegistered(format!(
                "main port held by {}",
                state.if_name
            )));
        }

        Self::publish(&*self.ledger, if_name, &ip.to_string())?;
        *state = MainPortSnapshot {
            if_name: if_name.to_string(),
            ip,
        };
        debug!(if_name, ip = %ip, "Main port claimed");
        Ok(())
    }

    /// Release the claim held by `if_name`.
    pub fn release(&self, if_name: &str) -> Result<(), LnnError> {
        let mut state = self.state.lock();
        if state.is_loopback() || state.if_name != if_name {
            return Err(LnnError::NotFound(format!(
                "{if_name} does not hold main"
            )));
        }

        Self::publish(&*self.ledger, LOOPBACK_IFNAME, LOOPBACK_IP)?;
        *state = MainPortSnapshot::loopback();
        debug!(if_name, "Main port released");
        Ok(())
    }

    fn publish(ledger: &dyn NodeLedger, if_name: &str, ip: &str) -> Result<(), LnnError> {
        ledger.set_str(StrKey::NetIfName, if_name)?;
        ledger.set_str(StrKey::WlanIp, ip)
    }
}
