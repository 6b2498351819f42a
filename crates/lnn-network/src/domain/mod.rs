//! # Domain Layer
//!
//! Subnet lifecycle, classification, the bounded subnet table, the
//! main-port guard and the protocol registry. No OS access happens here.

pub mod classify;
pub mod main_port;
pub mod netif_list;
pub mod protocol;
pub mod registry;
pub mod subnet;
pub mod subnet_table;

pub use classify::classify;
pub use main_port::{MainPort, MainPortSnapshot};
pub use netif_list::{NetifEntry, NetifList};
pub use protocol::{ProtocolManager, VisitControl};
pub use registry::ProtocolRegistry;
pub use subnet::{next_status, transact, Subnet, SubnetEvent, SubnetStatus};
pub use subnet_table::{SubnetTable, MAX_SUBNETS};
