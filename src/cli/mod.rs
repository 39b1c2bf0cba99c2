//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::chain::Chain;
use crate::config::Settings;
use crate::errors::{ChainError, Result};
use crate::storage::{is_not_found, BlobStore, LocalBlobStore};
use crate::vault::VaultStore;

/// StrippedChain CLI: tamper-evident file ledger.
#[derive(Parser)]
#[command(
    name = "strippedchain",
    about = "Tamper-evident file ledger with encrypted customer vaults",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Customer id that owns the files (default: default)
    #[arg(
        short,
        long,
        env = "STRIPPEDCHAIN_OWNER",
        default_value = "default",
        global = true
    )]
    pub owner: String,

    /// Data directory (overrides strippedchain.toml)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt files into the owner's vault and commit them as one block
    Ingest {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<String>,

        /// Note attached to every ingested file
        #[arg(long)]
        note: Option<String>,
    },

    /// Decrypt a file from the owner's vault
    Retrieve {
        /// File name as stored in the vault
        name: String,

        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Remove a file from the owner's vault
    Remove {
        /// File name as stored in the vault
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Verify the chain and every vault's Merkle root
    Verify,

    /// Show the blocks in the chain
    Show,

    /// List files in the owner's vault
    Files,

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Settings, storage and loaded vaults for one command invocation.
pub struct Workspace {
    pub settings: Settings,
    pub blobs: LocalBlobStore,
    pub vaults: VaultStore,
}

impl Workspace {
    /// Open the data directory and load every persisted vault.
    pub fn open(cli: &Cli, settings: Settings) -> Result<Self> {
        let blobs = LocalBlobStore::new(data_dir(cli, &settings)?);
        let vaults = VaultStore::new();
        vaults.load_all_from(&blobs, &settings.vault_bucket)?;
        Ok(Self {
            settings,
            blobs,
            vaults,
        })
    }

    /// Load the persisted chain, or start a new one if none exists yet.
    pub fn load_chain(&self) -> Result<Chain> {
        match self
            .blobs
            .get(&self.settings.chain_bucket, &self.settings.chain_key)
        {
            Ok(bytes) => Chain::from_json(&bytes),
            Err(e) if is_not_found(&e) => Ok(Chain::new()),
            Err(e) => Err(e),
        }
    }

    pub fn save_chain(&self, chain: &Chain) -> Result<()> {
        self.blobs.put(
            &self.settings.chain_bucket,
            &self.settings.chain_key,
            &chain.to_json()?,
        )
    }

    /// Persist one customer's vault.  Returns its vault id.
    pub fn save_vault(&self, customer_id: &str) -> Result<String> {
        self.vaults
            .persist_to(&self.blobs, &self.settings.vault_bucket, customer_id)
    }
}

/// Resolve the data directory from `--data-dir` or the settings.
pub fn data_dir(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.data_dir {
        Some(dir) => cwd.join(dir),
        None => settings.data_path(&cwd),
    })
}

/// Validate that an owner id is safe and sensible.
///
/// Allowed: ASCII letters, digits, hyphens, underscores, periods, `@`.
/// Must not be empty. Max length 128 characters.
pub fn validate_owner(owner: &str) -> Result<()> {
    if owner.is_empty() {
        return Err(ChainError::ConfigError("owner id cannot be empty".into()));
    }

    if owner.len() > 128 {
        return Err(ChainError::ConfigError(
            "owner id cannot exceed 128 characters".into(),
        ));
    }

    if !owner
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
    {
        return Err(ChainError::ConfigError(format!(
            "owner id '{owner}' is invalid; only letters, digits, '-', '_', '.', and '@' are allowed"
        )));
    }

    Ok(())
}
