//! # LNN Types Crate
//!
//! Domain types shared across the Local Network Negotiation crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: interface kinds, protocol bits and the
//!   negotiated node record are defined once here.
//! - **Ledger as a Port**: the longer-lived node ledger is an external
//!   collaborator; this crate only defines its contract plus an in-memory
//!   implementation for wiring and tests.

pub mod auth;
pub mod errors;
pub mod ledger;
pub mod netif;
pub mod node_info;
pub mod protocol;
pub mod version;

pub use auth::{AuthLinkType, AuthSide, ConnectOption};
pub use errors::LnnError;
pub use ledger::{InMemoryNodeLedger, NodeLedger, NumKey, StrKey};
pub use netif::{ConnectionAddrType, NetifType, NETIF_MASK_ALL, NETIF_MASK_IP};
pub use node_info::NodeInfo;
pub use protocol::{ProtocolMask, ProtocolType};
pub use version::SoftBusVersion;

/// Address the local node reports while no interface holds the main port.
pub const LOOPBACK_IP: &str = "127.0.0.1";

/// Interface name placeholder paired with [`LOOPBACK_IP`].
pub const LOOPBACK_IFNAME: &str = "lo";

/// Maximum length of an interface name (IFNAMSIZ minus the terminator).
pub const NET_IF_NAME_LEN: usize = 15;
