//! Project configuration (`strippedchain.toml`).

pub mod settings;

pub use settings::{LogFormat, Settings};
