//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce.  The
//! nonce travels next to the ciphertext in a `CipherPayload` instead of
//! being prepended, because vault metadata stores key, nonce and
//! ciphertext as separate hex fields.
//!
//! Layout of `CipherPayload::ciphertext`:
//!   [ ciphertext | 16-byte auth tag ]

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{ChainError, Result};

/// Size of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Key, nonce and ciphertext produced by one encryption call.
///
/// Key material is wiped when the payload is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherPayload {
    key: [u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl CipherPayload {
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext with the auth tag at the end.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Decrypt this payload with its own key and nonce.
    pub fn open(&self) -> Result<Vec<u8>> {
        decrypt(&self.key, &self.nonce, &self.ciphertext)
    }
}

impl fmt::Debug for CipherPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherPayload")
            .field("key", &"<redacted>")
            .field("nonce", &hex::encode(self.nonce))
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

/// Fill a buffer of `len` bytes from the OS CSPRNG.
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| ChainError::RandomSourceUnavailable(e.to_string()))?;
    Ok(buf)
}

/// Generate a random 32-byte AES-256 key.
pub fn generate_key() -> Result<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|e| ChainError::RandomSourceUnavailable(e.to_string()))?;
    Ok(key)
}

/// Generate a random 12-byte GCM nonce.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| ChainError::RandomSourceUnavailable(e.to_string()))?;
    Ok(nonce)
}

/// Encrypt `plaintext` with a 32-byte `key` under a freshly generated nonce.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<CipherPayload> {
    let cipher = build_cipher(key)?;
    let nonce = generate_nonce()?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| ChainError::InvalidArgument("plaintext too large for AES-GCM".into()))?;

    let mut key_bytes = [0u8; KEY_LEN];
    key_bytes.copy_from_slice(key);

    Ok(CipherPayload {
        key: key_bytes,
        nonce,
        ciphertext,
    })
}

/// Encrypt `plaintext` under a brand-new key and nonce.
pub fn seal(plaintext: &[u8]) -> Result<CipherPayload> {
    let mut key = generate_key()?;
    let payload = encrypt(&key, plaintext);
    key.zeroize();
    payload
}

/// Decrypt and authenticate `ciphertext` (tag included).
///
/// Either the full verified plaintext is returned or an error; partial
/// plaintext never leaves this function.
pub fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = build_cipher(key)?;

    if nonce.len() != NONCE_LEN {
        return Err(ChainError::InvalidArgument(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }
    if ciphertext.len() < TAG_LEN {
        return Err(ChainError::Truncated);
    }

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| ChainError::AuthenticationFailed)
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != KEY_LEN {
        return Err(ChainError::InvalidKeyLength(key.len()));
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| ChainError::InvalidKeyLength(key.len()))
}
