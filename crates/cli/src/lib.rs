//! Command implementations behind the `simrs-billing` binary.

pub mod commands;
pub mod config;

pub use config::CliConfig;
