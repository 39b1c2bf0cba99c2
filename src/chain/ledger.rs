//! The append-only chain of blocks.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::block::{Block, Record, GENESIS_PREVIOUS_HASH};
use crate::crypto::hash::digest_eq;
use crate::errors::{ChainError, Result};

/// Hash-linked sequence of blocks, genesis at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// Start a chain containing only a fresh genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// Rebuild a chain from stored blocks.  The blocks are not verified.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false` for chains built through `new` or `from_blocks`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn last(&self) -> Result<&Block> {
        self.blocks.last().ok_or(ChainError::EmptyChain)
    }

    /// Append a block holding `records`, stamped with the current time.
    pub fn append(&mut self, records: Vec<Record>) -> Result<&Block> {
        self.append_at(records, Utc::now())
    }

    /// Append a block with an explicit timestamp.
    ///
    /// Timestamps never go backwards: an earlier `timestamp` is raised to
    /// the previous block's, and each record's timestamp is raised to the
    /// latest one already in the chain.
    pub fn append_at(
        &mut self,
        mut records: Vec<Record>,
        timestamp: DateTime<Utc>,
    ) -> Result<&Block> {
        let prev = self.last()?;
        let mut floor = prev
            .records
            .iter()
            .map(|r| r.timestamp)
            .fold(prev.timestamp, |a, b| a.max(b));
        for record in &mut records {
            record.timestamp = record.timestamp.max(floor);
            floor = record.timestamp;
        }

        let block = Block::new(
            prev.index + 1,
            timestamp.max(prev.timestamp),
            &prev.hash,
            records,
        );
        info!(
            index = block.index,
            records = block.records.len(),
            hash = %block.hash,
            "appended block"
        );
        self.blocks.push(block);
        self.last()
    }

    /// Check every block's hash, position and link to its predecessor.
    ///
    /// Stops at the first bad block and reports its index.
    pub fn verify(&self) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(ChainError::EmptyChain);
        }

        for (i, block) in self.blocks.iter().enumerate() {
            if let Err(reason) = check_block(i, block, i.checked_sub(1).map(|p| &self.blocks[p])) {
                warn!(index = i, %reason, "chain verification failed");
                return Err(ChainError::ChainCorrupt { index: i, reason });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }

    /// All records across all blocks, in chain order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.blocks.iter().flat_map(|b| b.records.iter())
    }

    /// Serialize as `{"blocks": [...]}`.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ChainError::SerializationError(format!("chain: {e}")))
    }

    /// Deserialize without verifying; call `verify` afterwards.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let chain: Chain = serde_json::from_slice(bytes)
            .map_err(|e| ChainError::SerializationError(format!("chain JSON: {e}")))?;
        Self::from_blocks(chain.blocks)
    }
}

fn check_block(
    position: usize,
    block: &Block,
    prev: Option<&Block>,
) -> std::result::Result<(), String> {
    if usize::try_from(block.index).ok() != Some(position) {
        return Err(format!("index {} at position {position}", block.index));
    }

    match prev {
        None => {
            if block.previous_hash != GENESIS_PREVIOUS_HASH {
                return Err("genesis previous_hash is not the sentinel".into());
            }
        }
        Some(prev) => {
            if !digest_eq(&block.previous_hash, &prev.hash) {
                return Err("previous_hash does not match preceding block".into());
            }
        }
    }

    if !digest_eq(&block.hash, &block.calculate_hash()) {
        return Err("stored hash does not match block contents".into());
    }
    Ok(())
}

/// A chain behind one mutex, for callers appending from several threads.
#[derive(Default)]
pub struct SharedChain {
    inner: Mutex<Chain>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Mutex::new(chain),
        }
    }

    /// Append a block; returns a copy of it.
    pub fn append(&self, records: Vec<Record>) -> Result<Block> {
        self.lock()?.append(records).cloned()
    }

    pub fn verify(&self) -> Result<()> {
        self.lock()?.verify()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Copy of the chain as it is right now.
    pub fn snapshot(&self) -> Result<Chain> {
        Ok(self.lock()?.clone())
    }

    pub fn into_inner(self) -> Result<Chain> {
        self.inner.into_inner().map_err(|_| ChainError::LockPoisoned)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Chain>> {
        self.inner.lock().map_err(|_| ChainError::LockPoisoned)
    }
}
