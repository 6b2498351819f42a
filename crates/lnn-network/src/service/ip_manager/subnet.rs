//! IP subnet lifecycle.

use super::IpContext;
use crate::domain::{classify, transact, Subnet, SubnetEvent, SubnetStatus};
use lnn_types::ProtocolType;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Status plus the terminal flag set by `destroy`.
struct SubnetState {
    status: SubnetStatus,
    destroyed: bool,
}

/// IP transport bound to one interface.
///
/// The state mutex is held for a whole evaluation, so concurrent
/// notifications for the same interface apply one after the other. Once
/// destroyed, a subnet ignores every later notification, including ones
/// from callers that copied it out of the table before it was removed.
pub struct IpSubnet {
    if_name: String,
    ctx: Arc<IpContext>,
    state: Mutex<SubnetState>,
}

impl IpSubnet {
    /// Create an idle subnet on `if_name`.
    pub fn new(if_name: impl Into<String>, ctx: Arc<IpContext>) -> Self {
        Self {
            if_name: if_name.into(),
            ctx,
            state: Mutex::new(SubnetState {
                status: SubnetStatus::Idle,
                destroyed: false,
            }),
        }
    }

    /// Claim main and bring the link up.
    fn enable(&self, current: SubnetStatus) -> bool {
        let ip = match self.ctx.net.available_ip(&self.if_name) {
            Ok(ip) if !ip.is_loopback() => ip,
            Ok(ip) => {
                warn!(if_name = %self.if_name, ip = %ip, "Only a loopback address available");
                return self.reject();
            }
            Err(e) => {
                warn!(if_name = %self.if_name, error = %e, "No usable address");
                return self.reject();
            }
        };

        if let Err(e) = self.ctx.main_port.request(&self.if_name, ip) {
            warn!(if_name = %self.if_name, error = %e, "Main port request rejected");
            return false;
        }

        if current == SubnetStatus::Running {
            self.ctx.close_ip_link();
        }
        if let Err(e) = self.ctx.open_ip_link(ip) {
            warn!(if_name = %self.if_name, error = %e, "Opening IP link failed");
            return self.reject();
        }

        self.ctx.start_discovery();
        true
    }

    /// A failed enable leaves the subnet idle, so drop any claim a
    /// resetting subnet carried into it.
    fn reject(&self) -> bool {
        if let Err(e) = self.ctx.main_port.release(&self.if_name) {
            debug!(if_name = %self.if_name, error = %e, "No main port to release");
        }
        false
    }

    /// Tear the link down and give up main.
    ///
    /// A resetting subnet has no link left but still holds main.
    fn disable(&self, current: SubnetStatus) -> bool {
        match current {
            SubnetStatus::Running => {
                self.ctx.close_ip_link();
                self.ctx.stop_discovery();
                self.ctx.leave_old_network(&self.if_name);
            }
            SubnetStatus::Resetting => {}
            SubnetStatus::Idle | SubnetStatus::Shutdown => return true,
        }
        if let Err(e) = self.ctx.main_port.release(&self.if_name) {
            warn!(if_name = %self.if_name, error = %e, "Main port release failed");
        }
        true
    }

    /// Tear the link down but keep the main-port claim for re-enable.
    fn change_address(&self) -> bool {
        self.ctx.close_ip_link();
        self.ctx.stop_discovery();
        self.ctx.leave_old_network(&self.if_name);
        true
    }
}

impl Subnet for IpSubnet {
    fn if_name(&self) -> &str {
        &self.if_name
    }

    fn protocol(&self) -> ProtocolType {
        ProtocolType::Ip
    }

    fn status(&self) -> SubnetStatus {
        self.state.lock().status
    }

    fn on_netif_status_changed(&self) {
        let mut state = self.state.lock();
        if state.destroyed {
            debug!(if_name = %self.if_name, "Destroyed subnet ignores status change");
            return;
        }
        let status = state.status;
        let live = self.ctx.net.available_ip(&self.if_name).ok();
        let main = self.ctx.main_port.snapshot();

        let Some(event) = classify(status, &self.if_name, live, &main) else {
            debug!(if_name = %self.if_name, status = %status, "No subnet event");
            return;
        };
        debug!(if_name = %self.if_name, status = %status, event = event.as_str(), "Subnet event");

        let accepted = match event {
            SubnetEvent::IfReady => self.enable(status),
            SubnetEvent::IfDown => self.disable(status),
            SubnetEvent::IfChanged => self.change_address(),
        };
        state.status = transact(&self.if_name, ProtocolType::Ip, status, event, accepted);
    }

    fn on_softbus_network_disconnected(&self) {
        let mut state = self.state.lock();
        let eligible = matches!(state.status, SubnetStatus::Resetting | SubnetStatus::Idle);
        if state.destroyed || !eligible {
            return;
        }
        let status = state.status;
        let accepted = self.enable(status);
        state.status = transact(
            &self.if_name,
            ProtocolType::Ip,
            status,
            SubnetEvent::IfReady,
            accepted,
        );
    }

    fn destroy(&self) {
        let mut state = self.state.lock();
        if state.destroyed {
            return;
        }
        self.disable(state.status);
        state.status = SubnetStatus::Shutdown;
        state.destroyed = true;
        debug!(if_name = %self.if_name, "IP subnet destroyed");
    }
}
