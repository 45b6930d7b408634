//! User settings for hospital-reports
//!
//! Persisted as `config.json` in the base directory. Every field has a
//! default so older or hand-written files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::HospitalPaths;
use crate::error::HospitalError;
use crate::export::OutputFormat;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Format used by `report run` when `--format` is not given
    #[serde(default)]
    pub default_format: OutputFormat,

    /// Currency symbol for terminal rendering of money columns
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for terminal rendering (strftime)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// tracing filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_format: OutputFormat::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_default(paths: &HospitalPaths) -> Result<Self, HospitalError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| HospitalError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| HospitalError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &HospitalPaths) -> Result<(), HospitalError> {
        paths.ensure_directories()?;
        crate::storage::write_json_atomic(paths.settings_file(), self)
    }
}
