//! Blob storage seam.
//!
//! The core never touches storage directly; the CLI hands it a
//! `BlobStore` to read and write persisted vaults and chain state.
//! Objects are addressed S3-style by bucket + key.
//!
//! - `LocalBlobStore`: one directory per bucket under a root directory
//! - `MemoryBlobStore`: in-process map, for tests and dry runs

pub mod local;
pub mod memory;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

use crate::errors::{ChainError, Result};

/// Put/get access to opaque objects addressed by bucket and key.
pub trait BlobStore: Send + Sync {
    /// Store `data`, replacing any existing object.
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()>;

    /// Fetch an object.  Missing objects yield an `Io` error of kind
    /// `NotFound`.
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    fn exists(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Keys in a bucket, sorted.  An unknown bucket is empty.
    fn list(&self, bucket: &str) -> Result<Vec<String>>;
}

/// Error returned for a missing object.
pub(crate) fn not_found(bucket: &str, key: &str) -> ChainError {
    ChainError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("object {bucket}/{key} not found"),
    ))
}

/// Returns `true` if `err` means the object does not exist.
pub fn is_not_found(err: &ChainError) -> bool {
    matches!(err, ChainError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
}

/// Validate a bucket or key segment.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty, at most 255 characters, and not `.` or `..`.
pub(crate) fn validate_segment(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ChainError::InvalidArgument(format!(
            "{kind} name cannot be empty"
        )));
    }
    if name.len() > 255 {
        return Err(ChainError::InvalidArgument(format!(
            "{kind} name cannot exceed 255 characters"
        )));
    }
    if name == "." || name == ".." {
        return Err(ChainError::InvalidArgument(format!(
            "{kind} name '{name}' is reserved"
        )));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(ChainError::InvalidArgument(format!(
            "{kind} name '{name}' contains invalid characters; only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_segments() {
        assert!(validate_segment("key", "abc.json").is_ok());
        assert!(validate_segment("bucket", "vaults").is_ok());
        assert!(validate_segment("key", "a_b-c.1").is_ok());
    }

    #[test]
    fn rejects_path_traversal() {
        assert!(validate_segment("key", "..").is_err());
        assert!(validate_segment("key", "../etc").is_err());
        assert!(validate_segment("key", "a/b").is_err());
        assert!(validate_segment("key", "").is_err());
    }

    #[test]
    fn not_found_is_detected() {
        assert!(is_not_found(&not_found("b", "k")));
        assert!(!is_not_found(&ChainError::EmptyChain));
    }
}
