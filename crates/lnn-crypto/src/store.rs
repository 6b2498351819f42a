//! # Session Key Store
//!
//! Keys established by authentication, addressed two ways: by sequence
//! number when sending, and by (peer address, side) when receiving.

use crate::aead::{open, seal, SessionKey, OVERHEAD_LEN};
use crate::CryptoError;
use lnn_types::{AuthSide, ConnectOption};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

struct Session {
    option: ConnectOption,
    side: AuthSide,
    key: SessionKey,
}

/// Registry of live authentication sessions.
#[derive(Default)]
pub struct SessionKeyStore {
    sessions: RwLock<HashMap<i64, Session>>,
}

impl SessionKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the key negotiated for session `seq`. Replaces any previous key.
    pub fn insert(&self, seq: i64, option: ConnectOption, side: AuthSide, key: SessionKey) {
        debug!(seq, side = ?side, link = ?option.link_type(), "Session key stored");
        self.sessions.write().insert(seq, Session { option, side, key });
    }

    /// Forget session `seq`. Returns whether it existed.
    pub fn remove(&self, seq: i64) -> bool {
        self.sessions.write().remove(&seq).is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no session is stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Bytes every sealed buffer adds to its plaintext.
    pub fn overhead_len(&self) -> usize {
        OVERHEAD_LEN
    }

    /// Encrypt under session `seq`, returning the buffer and the local side.
    pub fn encrypt_by_seq(
        &self,
        seq: i64,
        plaintext: &[u8],
    ) -> Result<(Vec<u8>, AuthSide), CryptoError> {
        let sessions = self.sessions.read();
        let session = sessions
            .get(&seq)
            .ok_or_else(|| CryptoError::KeyNotFound(format!("seq {seq}")))?;
        Ok((seal(&session.key, plaintext)?, session.side))
    }

    /// Decrypt a buffer received from `option` in a session where the local
    /// device played `side`.
    pub fn decrypt(
        &self,
        option: &ConnectOption,
        side: AuthSide,
        sealed: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let sessions = self.sessions.read();
        let session = sessions
            .values()
            .find(|s| s.side == side && &s.option == option)
            .ok_or_else(|| CryptoError::KeyNotFound(format!("{option:?} as {side:?}")))?;
        open(&session.key, sealed)
    }
}
