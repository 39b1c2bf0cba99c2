//! `strippedchain verify`: check chain linkage and vault Merkle roots.

use crate::cli::output;
use crate::cli::Workspace;
use crate::errors::{ChainError, Result};

/// Execute the `verify` command.
pub fn execute(ws: &Workspace) -> Result<()> {
    let chain = ws.load_chain()?;
    chain.verify()?;
    output::success(&format!("Chain intact ({} block(s))", chain.len()));

    let mut bad = Vec::new();
    for customer_id in ws.vaults.customer_ids()? {
        let vault = ws.vaults.snapshot(&customer_id)?;
        match vault.verify_merkle_root() {
            Ok(()) => output::success(&format!(
                "Vault {} ({customer_id}): {} file(s), root ok",
                vault.vault_id,
                vault.files.len()
            )),
            Err(e) => {
                output::error(&format!("Vault {} ({customer_id}): {e}", vault.vault_id));
                bad.push(customer_id);
            }
        }
    }

    if !bad.is_empty() {
        return Err(ChainError::CommandFailed(format!(
            "{} vault(s) failed verification: {}",
            bad.len(),
            bad.join(", ")
        )));
    }

    Ok(())
}
