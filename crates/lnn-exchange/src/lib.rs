//! # LNN Device-Descriptor Exchange
//!
//! Packs the local node's descriptor as JSON, seals it with the
//! authentication session key and reverses the process for peer payloads.
//!
//! ## Flow
//!
//! ```text
//! ledger ─► NodeInfo ─► codec (BT | Wi-Fi) ─► JSON ─► AuthCipher::encrypt_by_seq
//! peer bytes ─► AuthCipher::decrypt ─► JSON ─► codec ─► NodeInfo
//! ```
//!
//! Codec selection and version gating live in [`codec`]; sealing is
//! delegated to an [`AuthCipher`], implemented here for
//! [`lnn_crypto::SessionKeyStore`].

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod codec;
mod errors;
pub mod exchange;
pub mod ports;

pub use codec::{codec_for, BtCodec, DescriptorCodec, WifiCodec};
pub use errors::ExchangeError;
pub use exchange::{DeviceInfoExchange, SealedDescriptor};
pub use ports::AuthCipher;
