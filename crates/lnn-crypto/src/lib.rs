//! # LNN Crypto
//!
//! Session-keyed authenticated encryption for device-descriptor exchange.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `aead` | AES-256-GCM seal/open with a fixed 28-byte header |
//! | `store` | Session keys addressed by sequence number or peer address |
//!
//! The authentication handshake that produces session keys lives outside
//! this crate; callers hand the negotiated key to [`SessionKeyStore::insert`].

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod aead;
mod errors;
pub mod store;

pub use aead::{open, seal, SessionKey, NONCE_LEN, OVERHEAD_LEN, TAG_LEN};
pub use errors::CryptoError;
pub use store::SessionKeyStore;
