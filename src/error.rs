//! Error types for hospital-reports
//!
//! Two layers, both built on thiserror:
//!
//! - [`ReportError`]: the contract of the report engine. Every failed
//!   `run_report` call yields exactly one of these, classified by
//!   [`ReportErrorKind`].
//! - [`HospitalError`]: the application error used by configuration,
//!   storage bootstrap, export and the CLI. Report failures convert into it.

use std::fmt;

use thiserror::Error;

/// Classification of report engine failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportErrorKind {
    /// Unknown report name
    NotFound,
    /// A parameter is unknown to the report, malformed, or does not resolve
    InvalidParameter,
    /// The data source could not be read
    SourceUnavailable,
}

impl fmt::Display for ReportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::SourceUnavailable => write!(f, "source unavailable"),
        }
    }
}

/// Error returned by the report engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Report error ({kind}): {message}")]
pub struct ReportError {
    pub kind: ReportErrorKind,
    pub message: String,
}

impl ReportError {
    /// Create an error of the given kind
    pub fn new(kind: ReportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// No report is registered under `name`
    pub fn report_not_found(name: impl fmt::Display) -> Self {
        Self::new(
            ReportErrorKind::NotFound,
            format!("no report named '{}'", name),
        )
    }

    /// A parameter failed validation
    pub fn invalid_parameter(name: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ReportErrorKind::InvalidParameter,
            format!("parameter '{}': {}", name, reason),
        )
    }

    /// The data source failed; `message` is carried through unchanged
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::new(ReportErrorKind::SourceUnavailable, message)
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind == ReportErrorKind::NotFound
    }

    /// Check if this is a parameter error
    pub fn is_invalid_parameter(&self) -> bool {
        self.kind == ReportErrorKind::InvalidParameter
    }

    /// Check if the data source failed
    pub fn is_source_unavailable(&self) -> bool {
        self.kind == ReportErrorKind::SourceUnavailable
    }
}

/// The main error type for application-level operations
#[derive(Error, Debug)]
pub enum HospitalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Report engine errors
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl HospitalError {
    /// Get the report error, if this wraps one
    pub fn as_report_error(&self) -> Option<&ReportError> {
        match self {
            Self::Report(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HospitalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HospitalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for application-level operations
pub type HospitalResult<T> = Result<T, HospitalError>;

/// Result type alias for report engine operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_not_found_display() {
        let err = ReportError::report_not_found("revenue-by-moon-phase");
        assert_eq!(
            err.to_string(),
            "Report error (not found): no report named 'revenue-by-moon-phase'"
        );
        assert!(err.is_not_found());
        assert!(!err.is_invalid_parameter());
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = ReportError::invalid_parameter("doctor", "no doctor with id 42");
        assert_eq!(err.kind, ReportErrorKind::InvalidParameter);
        assert!(err.to_string().contains("parameter 'doctor': no doctor with id 42"));
    }

    #[test]
    fn test_source_message_unchanged() {
        let err = ReportError::source_unavailable("Failed to open doctors.json: denied");
        assert_eq!(err.message, "Failed to open doctors.json: denied");
        assert!(err.is_source_unavailable());
    }

    #[test]
    fn test_report_error_converts() {
        let err: HospitalError = ReportError::report_not_found("x").into();
        assert!(err.as_report_error().is_some_and(|e| e.is_not_found()));
        assert!(err.to_string().starts_with("Report error (not found)"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HospitalError = io_err.into();
        assert!(matches!(err, HospitalError::Io(_)));
    }
}
