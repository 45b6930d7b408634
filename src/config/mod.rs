//! Configuration module for hospital-reports
//!
//! - Path resolution for settings, data files and exports
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::HospitalPaths;
pub use settings::Settings;
