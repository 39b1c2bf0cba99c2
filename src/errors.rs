use thiserror::Error;

/// All errors that can occur in StrippedChain.
#[derive(Debug, Error)]
pub enum ChainError {
    // --- Input errors ---
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Cannot compute a Merkle root from zero leaves")]
    EmptyInput,

    // --- Crypto errors ---
    #[error("Random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    #[error("Authentication failed: wrong key/nonce or corrupted ciphertext")]
    AuthenticationFailed,

    #[error("Ciphertext truncated: shorter than the authentication tag")]
    Truncated,

    // --- Vault errors ---
    #[error("Vault '{0}' not found")]
    VaultNotFound(String),

    #[error("File '{0}' not found in vault")]
    FileNotFound(String),

    #[error("Vault Merkle root does not match its files")]
    MerkleRootMismatch,

    // --- Chain errors ---
    #[error("Chain has no blocks")]
    EmptyChain,

    #[error("Chain corrupt at block {index}: {reason}")]
    ChainCorrupt { index: usize, reason: String },

    #[error("Lock poisoned: a previous writer panicked")]
    LockPoisoned,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl ChainError {
    /// Index of the failing block, if this is a chain verification error.
    pub fn failing_index(&self) -> Option<usize> {
        match self {
            ChainError::ChainCorrupt { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Convenience type alias for StrippedChain results.
pub type Result<T> = std::result::Result<T, ChainError>;
