//! # Subnet Table
//!
//! Fixed-capacity arena owning every live subnet.
//!
//! ## Locking
//!
//! One mutex guards the slot array. Lifecycle callbacks never run under
//! it: each operation copies the matching `Arc`s out, releases the lock,
//! then invokes them. A callback may therefore call back into the table.

mod table;

pub use table::{SubnetTable, MAX_SUBNETS};
