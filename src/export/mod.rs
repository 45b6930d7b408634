//! Export module for hospital-reports
//!
//! Writes report results in machine-readable formats:
//! - CSV: header row plus one line per row, nulls as empty fields
//! - JSON: array of row objects in column order
//! - YAML: the same shape as JSON, with a comment header

pub mod csv;
pub mod json;
pub mod yaml;

use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{HospitalError, HospitalResult};
use crate::reports::ReportTable;

pub use self::csv::export_report_csv;
pub use self::json::export_report_json;
pub use self::yaml::export_report_yaml;

/// Output format for report results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Terminal grid
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// JSON array of row objects
    Json,
    /// YAML sequence of row mappings
    Yaml,
}

impl OutputFormat {
    /// File extension for exported files
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Table => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            other => write!(f, "{}", other.extension()),
        }
    }
}

/// Write a report in one of the machine-readable formats
///
/// # Errors
///
/// `Table` is rendered by the display module and is rejected here.
pub fn export_report<W: Write>(
    table: &ReportTable,
    format: OutputFormat,
    writer: &mut W,
) -> HospitalResult<()> {
    match format {
        OutputFormat::Csv => export_report_csv(table, writer),
        OutputFormat::Json => export_report_json(table, writer),
        OutputFormat::Yaml => export_report_yaml(table, writer),
        OutputFormat::Table => Err(HospitalError::Export(
            "table output is rendered for the terminal, not exported".into(),
        )),
    }
}
