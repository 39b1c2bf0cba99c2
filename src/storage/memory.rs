//! In-memory blob store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{not_found, validate_segment, BlobStore};
use crate::errors::{ChainError, Result};

#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects across all buckets.
    pub fn len(&self) -> Result<usize> {
        Ok(self
            .objects
            .lock()
            .map_err(|_| ChainError::LockPoisoned)?
            .len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        validate_segment("bucket", bucket)?;
        validate_segment("key", key)?;
        self.objects
            .lock()
            .map_err(|_| ChainError::LockPoisoned)?
            .insert((bucket.to_string(), key.to_string()), data.to_vec());
        Ok(())
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .map_err(|_| ChainError::LockPoisoned)?
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| not_found(bucket, key))
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        Ok(self
            .objects
            .lock()
            .map_err(|_| ChainError::LockPoisoned)?
            .contains_key(&(bucket.to_string(), key.to_string())))
    }

    fn list(&self, bucket: &str) -> Result<Vec<String>> {
        // BTreeMap keeps (bucket, key) pairs ordered, so keys come out sorted.
        Ok(self
            .objects
            .lock()
            .map_err(|_| ChainError::LockPoisoned)?
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::is_not_found;

    #[test]
    fn put_get_list() {
        let store = MemoryBlobStore::new();
        assert!(store.is_empty().unwrap());

        store.put("vaults", "b.json", b"2").unwrap();
        store.put("vaults", "a.json", b"1").unwrap();
        store.put("ledger", "chain.json", b"[]").unwrap();

        assert_eq!(store.len().unwrap(), 3);
        assert_eq!(store.get("vaults", "a.json").unwrap(), b"1");
        assert_eq!(store.list("vaults").unwrap(), vec!["a.json", "b.json"]);
        assert!(store.exists("ledger", "chain.json").unwrap());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let store = MemoryBlobStore::new();
        store.put("vaults", "a.json", b"1").unwrap();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.objects.lock().unwrap();
            panic!("writer died");
        }));

        assert!(matches!(store.len(), Err(ChainError::LockPoisoned)));
        assert!(matches!(store.is_empty(), Err(ChainError::LockPoisoned)));
    }

    #[test]
    fn missing_is_not_found() {
        let store = MemoryBlobStore::new();
        assert!(is_not_found(&store.get("x", "y").unwrap_err()));
    }
}
