//! # Service Layer
//!
//! Concrete protocol managers wired to the ports.

pub mod ip_manager;

pub use ip_manager::{IpContext, IpProtocolManager, IpSubnet};
