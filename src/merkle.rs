//! Merkle commitments over chunked ciphertext.
//!
//! Data is split into fixed-size chunks, each chunk is hashed into a leaf,
//! and leaves are reduced pairwise into a single root:
//!
//! ```text
//! level 0:  L0    L1    L2    L2'      (odd level: last leaf duplicated)
//! level 1:  H(L0||L1)   H(L2||L2')
//! root:     H(level1[0] || level1[1])
//! ```
//!
//! Pairs are combined by concatenating the two *hex strings* and hashing
//! the result. Existing ledgers depend on this exact encoding.

use crate::crypto::hash::hash;
use crate::errors::{ChainError, Result};

/// Chunk size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Split `data` into chunks of `chunk_size` bytes.
///
/// The last chunk holds the remainder. Empty input yields a single empty
/// chunk so that every payload commits to at least one leaf.
pub fn split(data: &[u8], chunk_size: usize) -> Result<Vec<&[u8]>> {
    if chunk_size == 0 {
        return Err(ChainError::InvalidArgument(
            "chunk size must be greater than zero".into(),
        ));
    }
    if data.is_empty() {
        return Ok(vec![data]);
    }
    Ok(data.chunks(chunk_size).collect())
}

/// Hash one chunk into a leaf.
pub fn leaf(chunk: &[u8]) -> String {
    hash(chunk)
}

/// Reduce an ordered sequence of leaves to a root.
pub fn root<S: AsRef<str>>(leaves: &[S]) -> Result<String> {
    if leaves.is_empty() {
        return Err(ChainError::EmptyInput);
    }

    let mut level: Vec<String> = leaves.iter().map(|l| l.as_ref().to_string()).collect();

    while level.len() > 1 {
        if level.len() % 2 != 0 {
            if let Some(last) = level.last().cloned() {
                level.push(last);
            }
        }

        level = level
            .chunks_exact(2)
            .map(|pair| {
                let mut combined = String::with_capacity(pair[0].len() + pair[1].len());
                combined.push_str(&pair[0]);
                combined.push_str(&pair[1]);
                hash(combined.as_bytes())
            })
            .collect();
    }

    level.pop().ok_or(ChainError::EmptyInput)
}

/// Leaves and root computed over one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleCommitment {
    pub leaves: Vec<String>,
    pub root: String,
}

impl MerkleCommitment {
    /// Number of chunks the payload was split into.
    pub fn chunk_count(&self) -> usize {
        self.leaves.len()
    }
}

/// Split `data`, hash every chunk and compute the root.
pub fn commit(data: &[u8], chunk_size: usize) -> Result<MerkleCommitment> {
    let leaves: Vec<String> = split(data, chunk_size)?.into_iter().map(leaf).collect();
    let root = root(&leaves)?;
    Ok(MerkleCommitment { leaves, root })
}
