//! `strippedchain files`: list the owner's vault contents.

use crate::cli::output;
use crate::cli::{Cli, Workspace};
use crate::errors::{ChainError, Result};

/// Execute the `files` command.
pub fn execute(cli: &Cli, ws: &Workspace) -> Result<()> {
    let vault = match ws.vaults.snapshot(&cli.owner) {
        Ok(vault) => vault,
        Err(ChainError::VaultNotFound(_)) => {
            output::info(&format!("{} has no vault yet.", cli.owner));
            output::tip("Run `strippedchain ingest <FILE>` to create one.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    output::info(&format!(
        "Vault {} ({}), {} file(s), root {}",
        vault.vault_id,
        vault.customer_id,
        vault.files.len(),
        if vault.merkle_root.is_empty() {
            "-"
        } else {
            vault.merkle_root.as_str()
        }
    ));
    output::print_files_table(&vault.files);

    Ok(())
}
