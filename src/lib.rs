//! hospital-reports - analytical reports over hospital operations data
//!
//! A read-only reporting engine over a normalized hospital schema
//! (departments, doctors, patients, appointments, treatments, billing).
//! A fixed catalog of named reports is evaluated by a small relational
//! engine against any [`storage::DataSource`].
//!
//! # Architecture
//!
//! - `models`: entities, typed ids, money, table metadata
//! - `query`: plans and the evaluator (joins, grouping, aggregates, ordering)
//! - `reports`: the report catalog, definitions and parameters
//! - `storage`: data sources (in-memory and JSON files), integrity, schema DDL
//! - `display`, `export`: terminal grids and CSV/JSON/YAML output
//! - `config`: paths and settings
//! - `cli`: command handlers for the `hospital` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use hospital_reports::reports::{ReportCatalog, ReportParameters};
//! use hospital_reports::storage::sample_snapshot;
//!
//! let catalog = ReportCatalog::new(sample_snapshot()?);
//! let params = ReportParameters::new().with("from", "2024-02-01");
//! let table = catalog.run_report("department-financials", &params)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod reports;
pub mod storage;

pub use error::{HospitalError, ReportError, ReportErrorKind};
