//! SHA-256 hashing and hex helpers.
//!
//! Every digest in the system (Merkle leaves and nodes, composite record
//! hashes, block hashes) is carried around as a 64-character lowercase hex
//! string, so these helpers hash and return hex directly.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::{ChainError, Result};

/// Length of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_DIGEST_LEN: usize = DIGEST_LEN * 2;

/// Hash `data` with SHA-256 and return the lowercase hex digest.
pub fn hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hash the UTF-8 bytes of `data`.
pub fn hash_str(data: &str) -> String {
    hash(data.as_bytes())
}

/// Encode bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string into bytes.
pub fn from_hex(encoded: &str) -> Result<Vec<u8>> {
    hex::decode(encoded)
        .map_err(|e| ChainError::InvalidArgument(format!("malformed hex '{encoded}': {e}")))
}

/// Returns `true` if `value` looks like a hex SHA-256 digest.
pub fn is_hex_digest(value: &str) -> bool {
    value.len() == HEX_DIGEST_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Compare two digests in constant time.
pub fn digest_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
