//! CLI command handlers
//!
//! Bridges the clap argument parsing in `main` with the report catalog and
//! the storage layer.

pub mod data;
pub mod report;

pub use data::{handle_check, handle_config, handle_init, handle_schema};
pub use report::{handle_report_command, ReportCommands};
