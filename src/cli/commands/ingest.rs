//! `strippedchain ingest`: seal files into a vault and commit one block.

use std::fs;
use std::path::Path;

use crate::chain::SharedChain;
use crate::cli::output;
use crate::cli::{Cli, Workspace};
use crate::errors::{ChainError, Result};
use crate::ingest::{IngestRequest, Ingestor};

/// A file read from disk, ready to become an `IngestRequest`.
struct LoadedFile {
    location: String,
    name: String,
    file_type: &'static str,
    data: Vec<u8>,
}

/// Execute the `ingest` command.
pub fn execute(cli: &Cli, ws: &Workspace, files: &[String], note: Option<&str>) -> Result<()> {
    // 1. Read every file up front so a bad path fails before anything is sealed.
    let loaded = files
        .iter()
        .map(|f| load_file(Path::new(f)))
        .collect::<Result<Vec<_>>>()?;

    let requests: Vec<IngestRequest<'_>> = loaded
        .iter()
        .map(|f| IngestRequest {
            owner_id: &cli.owner,
            location: &f.location,
            name: &f.name,
            file_type: f.file_type,
            data: &f.data,
            note,
        })
        .collect();

    // 2. Seal into the vault and append one block for the batch.
    let chain = SharedChain::new(ws.load_chain()?);
    let ingestor = Ingestor::new(&ws.vaults, ws.settings.chunk_size)?;
    let (block, outcomes) = ingestor.ingest_batch(&chain, &requests)?;

    // 3. Persist the vault first, then the chain that references it.
    let vault_id = ws.save_vault(&cli.owner)?;
    ws.save_chain(&chain.into_inner()?)?;

    for outcome in &outcomes {
        output::success(&format!(
            "{} → {} ({} chunk(s))",
            outcome.record.record_id,
            outcome.record.record_hash,
            outcome.commitment.chunk_count()
        ));
    }
    output::info(&format!(
        "Block {} committed with {} record(s); vault {}",
        block.index,
        block.records.len(),
        vault_id
    ));
    output::tip("Run `strippedchain verify` to check the chain.");

    Ok(())
}

fn load_file(path: &Path) -> Result<LoadedFile> {
    let data = fs::read(path).map_err(|e| {
        ChainError::CommandFailed(format!("cannot read {}: {e}", path.display()))
    })?;
    let absolute = fs::canonicalize(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ChainError::InvalidArgument(format!("{} has no file name", path.display()))
        })?;

    Ok(LoadedFile {
        location: absolute.to_string_lossy().into_owned(),
        file_type: identify_file_type(&name),
        name,
        data,
    })
}

/// File type label from the extension; empty when unrecognized.
pub fn identify_file_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "PDF",
        Some("csv") => "CSV",
        Some("xlsx") => "XLSX",
        _ => "",
    }
}
