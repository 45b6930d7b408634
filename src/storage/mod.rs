//! Storage layer for hospital-reports
//!
//! The report engine reads through the [`DataSource`] trait. Two sources are
//! provided: an in-memory [`Snapshot`] and a [`JsonStore`] over one JSON file
//! per table. Writes exist only to seed a store; reports never write.

pub mod file_io;
pub mod integrity;
pub mod json_store;
pub mod sample;
pub mod schema;
pub mod snapshot;

pub use file_io::{json_file_valid, read_json_required, write_json_atomic};
pub use integrity::{check_integrity, IntegrityIssue};
pub use json_store::JsonStore;
pub use sample::sample_snapshot;
pub use schema::{render_schema, render_table};
pub use snapshot::Snapshot;

use crate::error::ReportResult;
use crate::models::EntityKind;
use crate::query::Record;

/// Read access to the hospital tables
///
/// A scan returns every row of one table. Implementations report any
/// failure as a `SourceUnavailable` report error carrying their own message.
pub trait DataSource {
    fn scan(&self, entity: EntityKind) -> ReportResult<Vec<Record>>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn scan(&self, entity: EntityKind) -> ReportResult<Vec<Record>> {
        (**self).scan(entity)
    }
}
