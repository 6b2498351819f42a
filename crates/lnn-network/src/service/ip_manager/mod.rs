//! # IP Transport Manager
//!
//! The IP protocol plugin. Each enabled Ethernet or WLAN interface gets an
//! [`IpSubnet`]; the subnet claims the main port and brings up the auth,
//! session and proxy listeners when its interface gains an address, and
//! tears them down when the address goes away or changes.

mod context;
mod manager;
mod subnet;

pub use context::IpContext;
pub use manager::IpProtocolManager;
pub use subnet::IpSubnet;
