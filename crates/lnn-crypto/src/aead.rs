//! # Sealed Boxes
//!
//! AES-256-GCM with a random 96-bit nonce. A sealed buffer is laid out as
//! `nonce || ciphertext || tag`, so its length is always the plaintext
//! length plus [`OVERHEAD_LEN`].

use crate::CryptoError;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::Zeroize;

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Bytes a sealed buffer carries beyond its plaintext.
pub const OVERHEAD_LEN: usize = NONCE_LEN + TAG_LEN;

/// Session key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SessionKey([u8; 32]);

impl SessionKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Encrypt `plaintext` under `key`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if the cipher rejects the input.
pub fn seal(key: &SessionKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let body = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + body.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decrypt a buffer produced by [`seal`].
///
/// # Errors
///
/// Returns `CryptoError::InvalidInput` if `sealed` is too short to hold a
/// nonce and tag, `CryptoError::DecryptionFailed` if authentication fails.
pub fn open(key: &SessionKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < OVERHEAD_LEN {
        return Err(CryptoError::InvalidInput(format!(
            "sealed buffer of {} bytes is shorter than the {OVERHEAD_LEN}-byte header",
            sealed.len()
        )));
    }

    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let (nonce, body) = sealed.split_at(NONCE_LEN);

    cipher
        .decrypt(Nonce::from_slice(nonce), body)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
