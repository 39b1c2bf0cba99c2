pub mod chain;
pub mod cli;
pub mod composite;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod ingest;
pub mod merkle;
pub mod storage;
pub mod vault;
