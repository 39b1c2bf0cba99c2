//! Chain module: the local, single-writer, hash-linked block log.
//!
//! This module provides:
//! - `Record` and `Block` types with the block hash rule (`block`)
//! - `Chain` with append/verify and `SharedChain` for locked access (`ledger`)

pub mod block;
pub mod ledger;

pub use block::{Block, Record, GENESIS_PREVIOUS_HASH};
pub use ledger::{Chain, SharedChain};
