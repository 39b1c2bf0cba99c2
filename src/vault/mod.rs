//! Vault module: per-customer encrypted file storage.
//!
//! This module provides:
//! - `VaultMetadata` and `VaultFileMetadata` types (`metadata`)
//! - JSON persistence with hex-encoded key material (`format`)
//! - `VaultStore`, the locked customer → vault registry (`store`)

pub mod format;
pub mod metadata;
pub mod store;

// Re-export the most commonly used items.
pub use metadata::{VaultFileMetadata, VaultMetadata};
pub use store::{VaultHandle, VaultStore};
