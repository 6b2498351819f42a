//! # LNN Test Suite
//!
//! Cross-crate scenarios that drive the network stack the way the soft bus
//! does: kernel notifications in, subnet transitions and sealed descriptors
//! out.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs              # Shared stack over recording doubles
//!     ├── monitor_flow.rs          # Monitor -> bus -> subnet
//!     ├── main_port.rs             # Single main interface under churn
//!     ├── capacity.rs              # Subnet table bound
//!     └── descriptor_exchange.rs   # Ledger -> codec -> cipher -> peer
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lnn-tests
//! cargo test -p lnn-tests integration::monitor_flow
//! ```

pub mod integration;
