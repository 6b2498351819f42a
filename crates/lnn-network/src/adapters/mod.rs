//! # Adapters
//!
//! Concrete collaborator implementations.
//!
//! | Adapter | Port | Availability |
//! |---------|------|--------------|
//! | `NetlinkMonitor` | `NotificationSource` | Linux, `os` feature |
//! | `OsNetQuery` | `NetQuery` | Unix, `os` feature |
//! | `TcpListenerService` | `Listener` | always |
//! | `LoggingDiscovery`, `LoggingMeshLeaver` | `Discovery`, `MeshLeaver` | always |
//! | `mocks::*` | every port | `test-utils` feature |

pub mod discovery;
pub mod listener;

#[cfg(all(feature = "os", target_os = "linux"))]
pub mod netlink;

#[cfg(all(feature = "os", unix))]
pub mod os_query;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use discovery::{LoggingDiscovery, LoggingMeshLeaver};
pub use listener::TcpListenerService;

#[cfg(all(feature = "os", target_os = "linux"))]
pub use netlink::NetlinkMonitor;

#[cfg(all(feature = "os", unix))]
pub use os_query::OsNetQuery;
