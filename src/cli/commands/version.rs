//! `strippedchain version`: display version information.

use console::style;

use crate::errors::Result;
use crate::merkle::DEFAULT_CHUNK_SIZE;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    println!("strippedchain {}", env!("CARGO_PKG_VERSION"));
    println!(
        "{}",
        style(format!(
            "AES-256-GCM vaults · SHA-256 Merkle chunks (default {DEFAULT_CHUNK_SIZE} bytes)"
        ))
        .dim()
    );
    Ok(())
}
