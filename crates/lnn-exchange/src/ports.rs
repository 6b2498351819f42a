//! # Outbound Ports
//!
//! The authentication service that owns the session keys.

use lnn_crypto::{CryptoError, SessionKeyStore};
use lnn_types::{AuthSide, ConnectOption};

/// Session-keyed encryption provided by authentication.
pub trait AuthCipher: Send + Sync {
    /// Seal `plaintext` under session `seq`. Returns the sealed buffer and
    /// the local side of that session.
    fn encrypt_by_seq(&self, seq: i64, plaintext: &[u8])
        -> Result<(Vec<u8>, AuthSide), CryptoError>;

    /// Open a buffer received from `option` in a session where the local
    /// device played `side`.
    fn decrypt(
        &self,
        option: &ConnectOption,
        side: AuthSide,
        sealed: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Bytes sealing adds to a plaintext.
    fn overhead_len(&self) -> usize;
}

impl AuthCipher for SessionKeyStore {
    fn encrypt_by_seq(
        &self,
        seq: i64,
        plaintext: &[u8],
    ) -> Result<(Vec<u8>, AuthSide), CryptoError> {
        SessionKeyStore::encrypt_by_seq(self, seq, plaintext)
    }

    fn decrypt(
        &self,
        option: &ConnectOption,
        side: AuthSide,
        sealed: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        SessionKeyStore::decrypt(self, option, side, sealed)
    }

    fn overhead_len(&self) -> usize {
        SessionKeyStore::overhead_len(self)
    }
}
