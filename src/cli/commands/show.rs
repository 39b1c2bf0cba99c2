//! `strippedchain show`: display the chain in a table.

use crate::cli::output;
use crate::cli::Workspace;
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(ws: &Workspace) -> Result<()> {
    let chain = ws.load_chain()?;

    output::info(&format!(
        "{} block(s), {} record(s)",
        chain.len(),
        chain.records().count()
    ));
    output::print_blocks_table(chain.blocks());

    Ok(())
}
