//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::chain::Block;
use crate::vault::VaultFileMetadata;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// First 16 hex chars of a digest, for table cells.
fn short(digest: &str) -> String {
    digest.chars().take(16).collect()
}

/// Print a table of blocks (Index, Timestamp, Hash, Previous, Records).
pub fn print_blocks_table(blocks: &[Block]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Index", "Timestamp", "Hash", "Previous", "Records"]);

    for b in blocks {
        let records = b
            .records
            .iter()
            .map(|r| format!("{} ({})", r.record_id, short(&r.record_hash)))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            b.index.to_string(),
            b.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            short(&b.hash),
            short(&b.previous_hash),
            records,
        ]);
    }

    println!("{table}");
}

/// Print a table of vault files (Name, Type, Size, Leaf, Note).
pub fn print_files_table(files: &[VaultFileMetadata]) {
    if files.is_empty() {
        info("No files in this vault yet.");
        tip("Run `strippedchain ingest <FILE>` to add your first file.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Type", "Size", "Leaf", "Note"]);

    for f in files {
        table.add_row(vec![
            f.name.clone(),
            f.file_type.clone(),
            f.size.to_string(),
            short(&f.merkle_leaf),
            f.note.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
}
