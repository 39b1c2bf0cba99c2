//! Process-wide vault registry.
//!
//! `VaultStore` maps each customer id to exactly one vault.  The map sits
//! behind one mutex and every vault behind its own, so mutations of
//! different customers run in parallel while add/remove on the same vault
//! are serialized for the whole mutate-then-recompute-root step.
//!
//! Lock order is always map → vault; nothing takes the map lock while
//! holding a vault lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::errors::{ChainError, Result};
use crate::storage::{is_not_found, BlobStore};

use super::format;
use super::metadata::{VaultFileMetadata, VaultMetadata};

/// Shared, lockable handle to one customer's vault.
pub type VaultHandle = Arc<Mutex<VaultMetadata>>;

#[derive(Default)]
pub struct VaultStore {
    /// customer_id -> vault
    vaults: Mutex<HashMap<String, VaultHandle>>,
}

impl VaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Lookup and creation
    // ------------------------------------------------------------------

    /// Return the customer's vault, creating an empty one on first use.
    pub fn get_or_create(&self, customer_id: &str) -> Result<VaultHandle> {
        let mut vaults = lock(&self.vaults)?;
        if let Some(handle) = vaults.get(customer_id) {
            return Ok(Arc::clone(handle));
        }

        let vault = VaultMetadata::new(customer_id)?;
        info!(customer_id, vault_id = %vault.vault_id, "created vault");
        let handle = Arc::new(Mutex::new(vault));
        vaults.insert(customer_id.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Return the customer's vault if it exists.
    pub fn get(&self, customer_id: &str) -> Result<VaultHandle> {
        lock(&self.vaults)?
            .get(customer_id)
            .cloned()
            .ok_or_else(|| ChainError::VaultNotFound(customer_id.to_string()))
    }

    /// Find a vault by its id rather than its customer.
    pub fn find_by_vault_id(&self, vault_id: &str) -> Result<VaultHandle> {
        let vaults = lock(&self.vaults)?;
        for handle in vaults.values() {
            if lock(handle)?.vault_id == vault_id {
                return Ok(Arc::clone(handle));
            }
        }
        Err(ChainError::VaultNotFound(vault_id.to_string()))
    }

    /// Customer ids with a vault, sorted.
    pub fn customer_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = lock(&self.vaults)?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(lock(&self.vaults)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Run `f` with exclusive access to the customer's vault.
    pub fn with_vault<T>(
        &self,
        customer_id: &str,
        f: impl FnOnce(&mut VaultMetadata) -> Result<T>,
    ) -> Result<T> {
        let handle = self.get(customer_id)?;
        let mut vault = lock(&handle)?;
        f(&mut vault)
    }

    /// Clone of the customer's vault as it is right now.
    pub fn snapshot(&self, customer_id: &str) -> Result<VaultMetadata> {
        self.with_vault(customer_id, |vault| Ok(vault.clone()))
    }

    // ------------------------------------------------------------------
    // File operations
    // ------------------------------------------------------------------

    /// Encrypt a file into the customer's vault, creating the vault if
    /// needed.
    pub fn add_file(
        &self,
        customer_id: &str,
        plaintext: &[u8],
        name: &str,
        file_type: &str,
    ) -> Result<VaultFileMetadata> {
        self.add_file_with_note(customer_id, plaintext, name, file_type, None)
    }

    pub fn add_file_with_note(
        &self,
        customer_id: &str,
        plaintext: &[u8],
        name: &str,
        file_type: &str,
        note: Option<&str>,
    ) -> Result<VaultFileMetadata> {
        let handle = self.get_or_create(customer_id)?;
        let mut vault = lock(&handle)?;
        vault.add_file_with_note(plaintext, name, file_type, note)
    }

    /// Remove the first file named `name`.
    ///
    /// A missing vault or file is a no-op that returns `Ok(false)`.
    pub fn remove_file(&self, customer_id: &str, name: &str) -> Result<bool> {
        let handle = match self.get(customer_id) {
            Ok(handle) => handle,
            Err(ChainError::VaultNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        let removed = lock(&handle)?.remove_file(name);
        if !removed {
            debug!(customer_id, file = %name, "remove_file: no such file");
        }
        Ok(removed)
    }

    /// Decrypt a file from the customer's vault.
    pub fn retrieve_file(&self, customer_id: &str, name: &str) -> Result<Vec<u8>> {
        self.with_vault(customer_id, |vault| vault.retrieve_file(name))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize the customer's vault.
    pub fn persist(&self, customer_id: &str) -> Result<Vec<u8>> {
        self.with_vault(customer_id, |vault| format::encode(vault))
    }

    /// Register a serialized vault, replacing any vault the same customer
    /// already has.  The stored Merkle root is not re-verified.
    pub fn load(&self, bytes: &[u8]) -> Result<VaultHandle> {
        let vault = format::decode(bytes)?;
        let customer_id = vault.customer_id.clone();
        let handle = Arc::new(Mutex::new(vault));
        if lock(&self.vaults)?
            .insert(customer_id.clone(), Arc::clone(&handle))
            .is_some()
        {
            warn!(customer_id = %customer_id, "loaded vault replaced an in-memory vault");
        }
        Ok(handle)
    }

    /// Write the customer's vault to `bucket` as `<vault_id>.json`.
    ///
    /// Returns the vault id.
    pub fn persist_to(
        &self,
        blobs: &dyn BlobStore,
        bucket: &str,
        customer_id: &str,
    ) -> Result<String> {
        let (vault_id, bytes) = self.with_vault(customer_id, |vault| {
            Ok((vault.vault_id.clone(), format::encode(vault)?))
        })?;
        blobs.put(bucket, &format::object_key(&vault_id), &bytes)?;
        debug!(customer_id, vault_id = %vault_id, "persisted vault");
        Ok(vault_id)
    }

    /// Load one vault by id from `bucket`.
    pub fn load_from(
        &self,
        blobs: &dyn BlobStore,
        bucket: &str,
        vault_id: &str,
    ) -> Result<VaultHandle> {
        let bytes = blobs
            .get(bucket, &format::object_key(vault_id))
            .map_err(|e| {
                if is_not_found(&e) {
                    ChainError::VaultNotFound(vault_id.to_string())
                } else {
                    e
                }
            })?;
        self.load(&bytes)
    }

    /// Load every vault stored in `bucket`.  Returns how many were loaded.
    pub fn load_all_from(&self, blobs: &dyn BlobStore, bucket: &str) -> Result<usize> {
        let mut count = 0;
        for key in blobs.list(bucket)? {
            if let Some(vault_id) = format::vault_id_from_key(&key) {
                self.load_from(blobs, bucket, vault_id)?;
                count += 1;
            }
        }
        Ok(count)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| ChainError::LockPoisoned)
}
