//! `strippedchain remove`: drop a file from the owner's vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Workspace};
use crate::errors::{ChainError, Result};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, ws: &Workspace, name: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before removing.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove '{name}' from {}'s vault?", cli.owner))
            .default(false)
            .interact()
            .map_err(|e| ChainError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    if !ws.vaults.remove_file(&cli.owner, name)? {
        output::warning(&format!("No file named '{name}', nothing removed."));
        return Ok(());
    }

    ws.save_vault(&cli.owner)?;
    output::success(&format!("Removed '{name}'"));
    output::tip("Blocks that recorded this file are unchanged.");

    Ok(())
}
