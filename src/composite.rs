//! Composite record hashes.
//!
//! A record hash binds where a file was read from, who owns it, and the
//! Merkle commitment over its ciphertext:
//!
//! ```text
//! a     = H(location_hash || owner_id)
//! b     = H(merkle_root   || merkle_leaf)
//! final = H(a || b)
//! ```
//!
//! `||` is plain string concatenation of the hex forms.

use crate::crypto::hash::{hash, hash_str};

/// The two intermediate hashes produced by `combine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeHashes {
    /// `H(location_hash || owner_id)`
    pub identity: String,
    /// `H(merkle_root || merkle_leaf)`
    pub content: String,
}

/// Hash a storage location (typically an absolute path).
pub fn location_hash(location: &str) -> String {
    hash_str(location)
}

/// Fold location, owner and Merkle commitment into two intermediate hashes.
pub fn combine(
    location_hash: &str,
    owner_id: &str,
    merkle_root: &str,
    merkle_leaf: &str,
) -> CompositeHashes {
    CompositeHashes {
        identity: hash(concat(location_hash, owner_id).as_bytes()),
        content: hash(concat(merkle_root, merkle_leaf).as_bytes()),
    }
}

/// Combine the two intermediate hashes into the final record hash.
pub fn finalize(identity: &str, content: &str) -> String {
    hash(concat(identity, content).as_bytes())
}

/// `combine` followed by `finalize`.
pub fn record_hash(
    location_hash: &str,
    owner_id: &str,
    merkle_root: &str,
    merkle_leaf: &str,
) -> String {
    let parts = combine(location_hash, owner_id, merkle_root, merkle_leaf);
    finalize(&parts.identity, &parts.content)
}

fn concat(a: &str, b: &str) -> String {
    let mut s = String::with_capacity(a.len() + b.len());
    s.push_str(a);
    s.push_str(b);
    s
}
