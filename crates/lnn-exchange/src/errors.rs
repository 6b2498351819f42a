//! Error types for descriptor exchange.

use lnn_types::AuthLinkType;
use thiserror::Error;

/// Errors from packing or unpacking a device descriptor.
///
/// Any error abandons the handshake attempt; no partial record is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The auth collaborator could not seal the payload.
    #[error("encryption failed: {0}")]
    Encrypt(String),

    /// The auth collaborator could not open the payload.
    #[error("decryption failed: {0}")]
    Decrypt(String),

    /// The plaintext is not a well-formed descriptor.
    #[error("malformed descriptor: {0}")]
    Parse(String),

    /// Caller input or local ledger state is unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No codec exists for this link type.
    #[error("no descriptor codec for {0:?}")]
    UnsupportedTransport(AuthLinkType),
}

impl From<serde_json::Error> for ExchangeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
