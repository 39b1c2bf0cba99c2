//! `strippedchain retrieve`: decrypt a file from the owner's vault.

use std::fs;
use std::io::{self, Write};

use crate::cli::output;
use crate::cli::{Cli, Workspace};
use crate::errors::Result;

/// Execute the `retrieve` command.
pub fn execute(cli: &Cli, ws: &Workspace, name: &str, output_path: Option<&str>) -> Result<()> {
    let plaintext = ws.vaults.retrieve_file(&cli.owner, name)?;

    match output_path {
        Some(path) => {
            fs::write(path, &plaintext)?;
            output::success(&format!(
                "Decrypted '{name}' ({} bytes) to {path}",
                plaintext.len()
            ));
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&plaintext)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
