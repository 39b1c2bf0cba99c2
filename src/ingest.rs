//! File ingestion: vault + Merkle + composite hash → chain record.
//!
//! For each file the `Ingestor`:
//! 1. seals the plaintext into the owner's vault (fresh key/nonce, leaf
//!    over the ciphertext, vault root refreshed),
//! 2. computes a chunked Merkle commitment over the ciphertext,
//! 3. folds the location hash, owner, chunk root and file leaf into the
//!    record hash,
//! 4. returns a `Record` ready to be batched into a block.
//!
//! The record's `metadata_hash` is the vault root right after the add,
//! tying the chain entry to the vault state it produced.

use tracing::debug;

use crate::chain::{Block, Record, SharedChain};
use crate::composite;
use crate::errors::{ChainError, Result};
use crate::merkle::MerkleCommitment;
use crate::vault::{VaultFileMetadata, VaultStore};

/// One file to ingest.  `location` is only hashed, never opened.
#[derive(Debug, Clone, Copy)]
pub struct IngestRequest<'a> {
    pub owner_id: &'a str,
    pub location: &'a str,
    pub name: &'a str,
    pub file_type: &'a str,
    pub data: &'a [u8],
    pub note: Option<&'a str>,
}

/// Everything derived while ingesting one file.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub record: Record,
    pub file: VaultFileMetadata,
    pub commitment: MerkleCommitment,
    pub vault_id: String,
}

pub struct Ingestor<'a> {
    vaults: &'a VaultStore,
    chunk_size: usize,
}

impl<'a> Ingestor<'a> {
    pub fn new(vaults: &'a VaultStore, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ChainError::InvalidArgument(
                "chunk size must be greater than zero".into(),
            ));
        }
        Ok(Self { vaults, chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Seal one file into its owner's vault and derive its record.
    pub fn ingest(&self, request: &IngestRequest<'_>) -> Result<IngestOutcome> {
        let handle = self.vaults.get_or_create(request.owner_id)?;
        let mut vault = handle.lock().map_err(|_| ChainError::LockPoisoned)?;

        let file = vault.add_file_with_note(
            request.data,
            request.name,
            request.file_type,
            request.note,
        )?;
        let commitment = file.commitment(self.chunk_size)?;

        let record_hash = composite::record_hash(
            &composite::location_hash(request.location),
            request.owner_id,
            &commitment.root,
            &file.merkle_leaf,
        );
        let record = Record::new(request.name, &record_hash, request.owner_id)
            .with_metadata_hash(&vault.merkle_root);

        debug!(
            owner = request.owner_id,
            file = request.name,
            chunks = commitment.chunk_count(),
            record_hash = %record_hash,
            "ingested file"
        );

        Ok(IngestOutcome {
            record,
            file,
            commitment,
            vault_id: vault.vault_id.clone(),
        })
    }

    /// Ingest a batch and commit all resulting records as one block.
    ///
    /// Files ingested before a failure stay in their vaults; no block is
    /// appended in that case.
    pub fn ingest_batch(
        &self,
        chain: &SharedChain,
        requests: &[IngestRequest<'_>],
    ) -> Result<(Block, Vec<IngestOutcome>)> {
        let outcomes = requests
            .iter()
            .map(|r| self.ingest(r))
            .collect::<Result<Vec<_>>>()?;
        let records = outcomes.iter().map(|o| o.record.clone()).collect();
        let block = chain.append(records)?;
        Ok((block, outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use crate::merkle;

    fn request<'a>(name: &'a str, data: &'a [u8]) -> IngestRequest<'a> {
        IngestRequest {
            owner_id: "cust-1",
            location: "/srv/in/file",
            name,
            file_type: "",
            data,
            note: None,
        }
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let vaults = VaultStore::new();
        assert!(Ingestor::new(&vaults, 0).is_err());
    }

    #[test]
    fn record_hash_binds_commitment() {
        let vaults = VaultStore::new();
        let ingestor = Ingestor::new(&vaults, 1024).unwrap();
        let data = vec![3u8; 3000];
        let out = ingestor.ingest(&request("big.bin", &data)).unwrap();

        // 3000 bytes + 16-byte tag -> 3016 bytes of ciphertext
        assert_eq!(out.commitment.chunk_count(), 3);
        assert_eq!(out.file.merkle_leaf, merkle::leaf(&out.file.ciphertext));

        let expected = composite::record_hash(
            &composite::location_hash("/srv/in/file"),
            "cust-1",
            &out.commitment.root,
            &out.file.merkle_leaf,
        );
        assert_eq!(out.record.record_hash, expected);
        assert_eq!(out.record.record_id, "big.bin");
    }

    #[test]
    fn metadata_hash_tracks_vault_root() {
        let vaults = VaultStore::new();
        let ingestor = Ingestor::new(&vaults, 64).unwrap();
        ingestor.ingest(&request("a", b"one")).unwrap();
        let second = ingestor.ingest(&request("b", b"two")).unwrap();

        let vault = vaults.snapshot("cust-1").unwrap();
        assert_eq!(second.record.metadata_hash.as_deref(), Some(vault.merkle_root.as_str()));
        assert_eq!(second.vault_id, vault.vault_id);
    }

    #[test]
    fn batch_appends_one_block() {
        let vaults = VaultStore::new();
        let chain = SharedChain::new(Chain::new());
        let ingestor = Ingestor::new(&vaults, 16).unwrap();

        let (block, outcomes) = ingestor
            .ingest_batch(&chain, &[request("a", b"aaa"), request("b", b"bbb")])
            .unwrap();

        assert_eq!(block.index, 1);
        assert_eq!(block.records.len(), 2);
        assert_eq!(outcomes.len(), 2);
        assert!(chain.verify().is_ok());
        assert_eq!(vaults.snapshot("cust-1").unwrap().files.len(), 2);
    }
}
