use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ChainError, Result};
use crate::merkle::DEFAULT_CHUNK_SIZE;

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Project-level configuration, loaded from `strippedchain.toml`.
///
/// Every field has a sensible default so StrippedChain works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding vaults and the chain.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Bucket under `data_dir` where vault JSON files live.
    #[serde(default = "default_vault_bucket")]
    pub vault_bucket: String,

    /// Bucket under `data_dir` holding the chain.
    #[serde(default = "default_chain_bucket")]
    pub chain_bucket: String,

    /// Object key of the chain inside `chain_bucket`.
    #[serde(default = "default_chain_key")]
    pub chain_key: String,

    /// Merkle chunk size in bytes (default: 1024).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_vault_bucket() -> String {
    "vaults".to_string()
}

fn default_chain_bucket() -> String {
    "ledger".to_string()
}

fn default_chain_key() -> String {
    "chain.json".to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            vault_bucket: default_vault_bucket(),
            chain_bucket: default_chain_bucket(),
            chain_key: default_chain_key(),
            chunk_size: default_chunk_size(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = "strippedchain.toml";

    /// Load settings from `<project_dir>/strippedchain.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ChainError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the core would refuse later anyway.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChainError::ConfigError(
                "chunk_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Full path of the data directory.
    ///
    /// Example: `project_dir/data`
    pub fn data_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
