//! Log-only discovery and mesh adapters for hosts without a discovery
//! service. They track state so repeated calls are visible in logs.

use crate::ports::{CollaboratorError, Discovery, LinkStatus, MeshLeaver};
use lnn_types::{ConnectionAddrType, ProtocolType};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Discovery service that only logs.
#[derive(Debug, Default)]
pub struct LoggingDiscovery {
    publishing: AtomicBool,
    discovering: AtomicBool,
}

impl LoggingDiscovery {
    /// Create an idle service.
    pub fn new() -> Self {
        Self::default()
    }
}

fn toggle(flag: &AtomicBool, on: bool, what: &'static str) {
    if flag.swap(on, Ordering::AcqRel) != on {
        info!(what, active = on, "Discovery state changed");
    } else {
        debug!(what, active = on, "Discovery state unchanged");
    }
}

impl Discovery for LoggingDiscovery {
    fn start_publish(&self) -> Result<(), CollaboratorError> {
        toggle(&self.publishing, true, "publish");
        Ok(())
    }

    fn stop_publish(&self) -> Result<(), CollaboratorError> {
        toggle(&self.publishing, false, "publish");
        Ok(())
    }

    fn start_discovery(&self) -> Result<(), CollaboratorError> {
        toggle(&self.discovering, true, "discovery");
        Ok(())
    }

    fn stop_discovery(&self) -> Result<(), CollaboratorError> {
        toggle(&self.discovering, false, "discovery");
        Ok(())
    }

    fn link_status_changed(&self, status: LinkStatus, transport: ProtocolType) {
        info!(status = ?status, transport = %transport, "Link status changed");
    }
}

/// Mesh layer that only logs leave requests.
#[derive(Debug, Default)]
pub struct LoggingMeshLeaver;

impl MeshLeaver for LoggingMeshLeaver {
    fn request_leave_by_addr_type(
        &self,
        addr_types: &[ConnectionAddrType],
    ) -> Result<(), CollaboratorError> {
        info!(addr_types = ?addr_types, "Leave requested");
        Ok(())
    }
}
