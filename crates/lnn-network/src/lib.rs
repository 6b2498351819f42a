//! # LNN Network Management
//!
//! Watches OS network interfaces, keeps the set of pluggable transports and
//! drives one state machine per (interface, transport) binding.
//!
//! ## Architecture
//!
//! - **Domain Layer:** subnet state machine, event classification, the
//!   bounded subnet table, the main-port guard, the protocol registry
//! - **Ports Layer:** the API offered to the soft bus and the collaborator
//!   traits this crate depends on
//! - **Service Layer:** the IP transport manager
//! - **Adapters Layer:** netlink monitor, OS queries, TCP listeners and
//!   recording test doubles (feature-gated)
//! - **Monitor:** supervised notification threads feeding the event bus
//!
//! ## Example
//!
//! ```rust
//! use lnn_network::domain::{next_status, SubnetEvent, SubnetStatus};
//!
//! let status = next_status(SubnetStatus::Idle, SubnetEvent::IfReady, true);
//! assert_eq!(status, SubnetStatus::Running);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod config;
pub mod domain;
pub mod manager;
pub mod monitor;
pub mod ports;
pub mod service;

// =============================================================================
// ADAPTERS
// =============================================================================

pub mod adapters;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use config::{ConfigError, MonitorConfig, NetworkConfig};
pub use domain::{
    MainPort, NetifEntry, NetifList, ProtocolManager, Subnet, SubnetStatus, SubnetTable,
    VisitControl, MAX_SUBNETS,
};
pub use manager::NetworkManager;
pub use monitor::{start_monitors, MonitorError, MonitorHandle, MonitorHealth, NotificationSource};
pub use ports::{CollaboratorError, Discovery, LinkStatus, Listener, LnnNetworkApi, MeshLeaver, NetQuery};
pub use service::{IpContext, IpProtocolManager};
