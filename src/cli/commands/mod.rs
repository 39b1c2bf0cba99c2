//! One module per subcommand, each exposing `execute`.

pub mod completions;
pub mod files;
pub mod ingest;
pub mod remove;
pub mod retrieve;
pub mod show;
pub mod verify;
pub mod version;
