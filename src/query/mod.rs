//! Relational query evaluation
//!
//! A small, read-only evaluator for declarative [`QueryPlan`]s: scans,
//! equality joins, grouping, aggregates, HAVING, ordering and a row cap.

pub mod engine;
pub mod plan;
pub mod record;
pub mod value;

pub use engine::{execute, ColumnSpec, ResultSet};
pub use plan::{
    col, ColumnRef, CompareOp, Condition, Direction, GroupKey, Having, Join, JoinKind, Literal,
    Measure, MeasureDef, QueryPlan, ScanFilter, ScanPredicate, SortKey, Source,
};
pub use record::Record;
pub use value::{round2, ColumnType, Value, ValueKey};
