//! Cryptographic primitives for StrippedChain.
//!
//! This module provides:
//! - SHA-256 hashing and hex helpers (`hash`)
//! - AES-256-GCM encryption, decryption and key/nonce generation (`encryption`)

pub mod encryption;
pub mod hash;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, hash, ...};
pub use encryption::{
    decrypt, encrypt, generate_key, generate_nonce, random_bytes, seal, CipherPayload,
};
pub use hash::{digest_eq, from_hex, hash, hash_str, to_hex};
