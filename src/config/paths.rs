//! Path management for hospital-reports
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` flag / `HOSPITAL_REPORTS_DIR` environment variable
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/hospital-reports` or `~/.config/hospital-reports`
//! 3. Windows: `%APPDATA%\hospital-reports`

use std::path::PathBuf;

use crate::error::HospitalError;
use crate::models::EntityKind;

/// Environment variable overriding the base directory
pub const DIR_ENV_VAR: &str = "HOSPITAL_REPORTS_DIR";

/// Manages all paths used by hospital-reports
#[derive(Debug, Clone)]
pub struct HospitalPaths {
    base_dir: PathBuf,
}

impl HospitalPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application data directory can be found.
    pub fn new() -> Result<Self, HospitalError> {
        let base_dir = match std::env::var(DIR_ENV_VAR) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create HospitalPaths with a custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON file per table
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default destination for exported reports
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Data file for a table, e.g. `data/doctors.json`
    pub fn table_file(&self, entity: EntityKind) -> PathBuf {
        self.data_dir().join(format!("{}.json", entity.file_stem()))
    }

    /// Ensure the base, data and exports directories exist
    pub fn ensure_directories(&self) -> Result<(), HospitalError> {
        for dir in [self.base_dir.clone(), self.data_dir(), self.exports_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                HospitalError::Io(format!("Failed to create directory {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Check whether every table file is present
    pub fn has_dataset(&self) -> bool {
        EntityKind::ALL.iter().all(|e| self.table_file(*e).exists())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, HospitalError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                HospitalError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("hospital-reports"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, HospitalError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| HospitalError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("hospital-reports"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HospitalPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_table_files() {
        let paths = HospitalPaths::with_base_dir(PathBuf::from("/srv/hospital"));
        assert_eq!(
            paths.table_file(EntityKind::Billing),
            PathBuf::from("/srv/hospital/data/billing.json")
        );
        assert_eq!(
            paths.table_file(EntityKind::Doctor),
            PathBuf::from("/srv/hospital/data/doctors.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HospitalPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.exports_dir().exists());
        assert!(!paths.has_dataset());
    }
}
