//! Records and blocks.
//!
//! A block's hash covers its index, timestamp, previous hash and every
//! record it carries:
//!
//! ```text
//! hash     = SHA256( f(index) f(timestamp) f(previous_hash) "[" count ":" record* "]" )
//! record   = "{" f(record_id) f(record_hash) metadata f(owner_id) f(timestamp) "}"
//! metadata = "-" | "+" f(metadata_hash)
//! f(s)     = len(s) ":" s
//! ```
//!
//! Every field is length-prefixed so no two distinct blocks share a hash
//! input.  Timestamps are rendered as RFC 3339 UTC with nanosecond
//! precision.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::hash::hash_str;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// One committed file entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub record_id: String,
    pub record_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_hash: Option<String>,
    pub owner_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Record {
    /// New record stamped with the current time.
    pub fn new(record_id: &str, record_hash: &str, owner_id: &str) -> Self {
        Self {
            record_id: record_id.to_string(),
            record_hash: record_hash.to_string(),
            metadata_hash: None,
            owner_id: owner_id.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_metadata_hash(mut self, metadata_hash: &str) -> Self {
        self.metadata_hash = Some(metadata_hash.to_string());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn write_canonical(&self, out: &mut String) {
        out.push('{');
        write_field(out, &self.record_id);
        write_field(out, &self.record_hash);
        match &self.metadata_hash {
            Some(metadata_hash) => {
                out.push('+');
                write_field(out, metadata_hash);
            }
            None => out.push('-'),
        }
        write_field(out, &self.owner_id);
        write_field(out, &render_timestamp(&self.timestamp));
        out.push('}');
    }
}

/// A block in the chain.  Fields are public for inspection; only
/// `Block::genesis` and `Chain::append` produce hashes that verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub hash: String,
    pub previous_hash: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Block {
    /// Build a block and compute its hash.
    pub fn new(
        index: u64,
        timestamp: DateTime<Utc>,
        previous_hash: &str,
        records: Vec<Record>,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            hash: String::new(),
            previous_hash: previous_hash.to_string(),
            records,
        };
        block.hash = block.calculate_hash();
        block
    }

    /// First block of every chain.
    pub fn genesis() -> Self {
        Self::genesis_at(Utc::now())
    }

    pub fn genesis_at(timestamp: DateTime<Utc>) -> Self {
        Self::new(0, timestamp, GENESIS_PREVIOUS_HASH, Vec::new())
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Hash over every field except `hash` itself.
    pub fn calculate_hash(&self) -> String {
        let mut input = String::new();
        write_field(&mut input, &self.index.to_string());
        write_field(&mut input, &render_timestamp(&self.timestamp));
        write_field(&mut input, &self.previous_hash);
        input.push('[');
        input.push_str(&self.records.len().to_string());
        input.push(':');
        for record in &self.records {
            record.write_canonical(&mut input);
        }
        input.push(']');
        hash_str(&input)
    }
}

/// Append `value` as `<byte length>:<value>`.
fn write_field(out: &mut String, value: &str) {
    out.push_str(&value.len().to_string());
    out.push(':');
    out.push_str(value);
}

fn render_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
