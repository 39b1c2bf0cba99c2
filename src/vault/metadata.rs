//! Vault and file metadata.
//!
//! A `VaultMetadata` belongs to exactly one customer and owns an ordered
//! list of `VaultFileMetadata`, one per encrypted file.  Each file carries
//! its own key and nonce; the vault keeps a Merkle root over the files'
//! leaves, recomputed on every add and remove.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::encryption::{decrypt, generate_key, generate_nonce, random_bytes, seal};
use crate::crypto::hash::{digest_eq, to_hex};
use crate::errors::{ChainError, Result};
use crate::merkle::{self, MerkleCommitment};

use super::format::{hex_decode, hex_encode};

/// Number of random bytes in a vault id (128 bits).
const VAULT_ID_LEN: usize = 16;

/// One encrypted file stored in a vault.  Key and nonce are wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct VaultFileMetadata {
    /// File name, unique lookups resolve to the first match.
    #[zeroize(skip)]
    pub name: String,

    /// Free-form file type label (e.g. "PDF").
    #[serde(rename = "type")]
    #[zeroize(skip)]
    pub file_type: String,

    /// Plaintext size in bytes.
    #[zeroize(skip)]
    pub size: u64,

    /// Per-file AES-256 key (hex in JSON).
    #[serde(serialize_with = "hex_encode", deserialize_with = "hex_decode")]
    pub key: Vec<u8>,

    /// Per-file GCM nonce (hex in JSON).
    #[serde(serialize_with = "hex_encode", deserialize_with = "hex_decode")]
    pub nonce: Vec<u8>,

    /// Ciphertext with auth tag (hex in JSON).
    #[serde(
        rename = "encrypted_data",
        serialize_with = "hex_encode",
        deserialize_with = "hex_decode"
    )]
    #[zeroize(skip)]
    pub ciphertext: Vec<u8>,

    /// Hash of the ciphertext.
    #[zeroize(skip)]
    pub merkle_leaf: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub note: Option<String>,
}

impl VaultFileMetadata {
    /// Encrypt `plaintext` under a fresh key/nonce and describe the result.
    pub fn seal(
        plaintext: &[u8],
        name: &str,
        file_type: &str,
        note: Option<&str>,
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(ChainError::InvalidArgument(
                "file name cannot be empty".into(),
            ));
        }

        let payload = seal(plaintext)?;
        let size = u64::try_from(plaintext.len()).map_err(|_| {
            ChainError::InvalidArgument(format!("file '{name}' is too large to describe"))
        })?;

        Ok(Self {
            name: name.to_string(),
            file_type: file_type.to_string(),
            size,
            key: payload.key().to_vec(),
            nonce: payload.nonce().to_vec(),
            ciphertext: payload.ciphertext().to_vec(),
            merkle_leaf: merkle::leaf(payload.ciphertext()),
            note: note.map(str::to_string),
        })
    }

    /// Decrypt the stored ciphertext with this file's own key and nonce.
    pub fn decrypt(&self) -> Result<Vec<u8>> {
        decrypt(&self.key, &self.nonce, &self.ciphertext)
    }

    /// Chunked Merkle commitment over the ciphertext.
    pub fn commitment(&self, chunk_size: usize) -> Result<MerkleCommitment> {
        merkle::commit(&self.ciphertext, chunk_size)
    }
}

impl fmt::Debug for VaultFileMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultFileMetadata")
            .field("name", &self.name)
            .field("file_type", &self.file_type)
            .field("size", &self.size)
            .field("key", &"<redacted>")
            .field("nonce", &to_hex(&self.nonce))
            .field("ciphertext_len", &self.ciphertext.len())
            .field("merkle_leaf", &self.merkle_leaf)
            .field("note", &self.note)
            .finish()
    }
}

/// Per-customer vault.  The vault-level key and nonce are wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct VaultMetadata {
    #[zeroize(skip)]
    pub vault_id: String,
    #[zeroize(skip)]
    pub customer_id: String,

    /// Vault-level key, generated at creation and persisted.
    #[serde(serialize_with = "hex_encode", deserialize_with = "hex_decode")]
    pub key: Vec<u8>,

    /// Vault-level nonce, generated at creation and persisted.
    #[serde(serialize_with = "hex_encode", deserialize_with = "hex_decode")]
    pub nonce: Vec<u8>,

    /// Each file wipes its own key material on drop.
    #[serde(rename = "encrypted_files", default)]
    #[zeroize(skip)]
    pub files: Vec<VaultFileMetadata>,

    /// Root over `files[*].merkle_leaf`; empty while the vault has no files.
    #[serde(default)]
    #[zeroize(skip)]
    pub merkle_root: String,
}

impl VaultMetadata {
    /// Create an empty vault with a random id and fresh key material.
    pub fn new(customer_id: &str) -> Result<Self> {
        if customer_id.is_empty() {
            return Err(ChainError::InvalidArgument(
                "customer id cannot be empty".into(),
            ));
        }

        Ok(Self {
            vault_id: to_hex(&random_bytes(VAULT_ID_LEN)?),
            customer_id: customer_id.to_string(),
            key: generate_key()?.to_vec(),
            nonce: generate_nonce()?.to_vec(),
            files: Vec::new(),
            merkle_root: String::new(),
        })
    }

    /// Encrypt and append a file, then refresh the Merkle root.
    pub fn add_file(
        &mut self,
        plaintext: &[u8],
        name: &str,
        file_type: &str,
    ) -> Result<VaultFileMetadata> {
        self.add_file_with_note(plaintext, name, file_type, None)
    }

    /// Like `add_file`, attaching an optional note to the metadata.
    pub fn add_file_with_note(
        &mut self,
        plaintext: &[u8],
        name: &str,
        file_type: &str,
        note: Option<&str>,
    ) -> Result<VaultFileMetadata> {
        let file = VaultFileMetadata::seal(plaintext, name, file_type, note)?;
        self.add_file_metadata(file.clone())?;
        Ok(file)
    }

    /// Append already-sealed file metadata and refresh the Merkle root.
    pub fn add_file_metadata(&mut self, file: VaultFileMetadata) -> Result<()> {
        debug!(vault_id = %self.vault_id, file = %file.name, "adding file to vault");
        self.files.push(file);
        self.recompute_merkle_root()
    }

    /// Remove the first file named `name`.
    ///
    /// Returns `false` without touching the vault when no file matches.
    pub fn remove_file(&mut self, name: &str) -> bool {
        let Some(pos) = self.files.iter().position(|f| f.name == name) else {
            return false;
        };
        self.files.remove(pos);
        // Cannot fail: zero files short-circuits to the empty root.
        self.merkle_root = self.compute_merkle_root().unwrap_or_default();
        debug!(vault_id = %self.vault_id, file = %name, "removed file from vault");
        true
    }

    /// Look up a file by name (first match).
    pub fn file(&self, name: &str) -> Option<&VaultFileMetadata> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Decrypt a file by name.
    pub fn retrieve_file(&self, name: &str) -> Result<Vec<u8>> {
        self.file(name)
            .ok_or_else(|| ChainError::FileNotFound(name.to_string()))?
            .decrypt()
    }

    /// Leaves of all files in order.
    pub fn leaves(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.merkle_leaf.as_str()).collect()
    }

    /// Compute the root over the current files without storing it.
    pub fn compute_merkle_root(&self) -> Result<String> {
        if self.files.is_empty() {
            return Ok(String::new());
        }
        merkle::root(&self.leaves())
    }

    /// Recompute and store the Merkle root.
    pub fn recompute_merkle_root(&mut self) -> Result<()> {
        self.merkle_root = self.compute_merkle_root()?;
        Ok(())
    }

    /// Check the stored root against the files.
    ///
    /// Loading a vault never runs this; callers wanting assurance do.
    pub fn verify_merkle_root(&self) -> Result<()> {
        let expected = self.compute_merkle_root()?;
        if digest_eq(&expected, &self.merkle_root) {
            Ok(())
        } else {
            Err(ChainError::MerkleRootMismatch)
        }
    }
}

impl fmt::Debug for VaultMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultMetadata")
            .field("vault_id", &self.vault_id)
            .field("customer_id", &self.customer_id)
            .field("key", &"<redacted>")
            .field("files", &self.files)
            .field("merkle_root", &self.merkle_root)
            .finish()
    }
}
