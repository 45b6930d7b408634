//! Referential integrity checks
//!
//! The engine assumes unique primary keys and resolvable foreign keys. These
//! checks find the rows that break either assumption.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::DataSource;
use crate::error::ReportResult;
use crate::models::EntityKind;

/// A single integrity violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Two or more rows share a primary key
    DuplicateKey { entity: EntityKind, id: i64 },
    /// A foreign key names a row that does not exist
    DanglingReference {
        entity: EntityKind,
        id: i64,
        column: &'static str,
        target: EntityKind,
        target_id: i64,
    },
    /// A row has no usable primary key
    MissingKey { entity: EntityKind },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { entity, id } => {
                write!(f, "{} {}: duplicate primary key", entity.table_name(), id)
            }
            Self::DanglingReference {
                entity,
                id,
                column,
                target,
                target_id,
            } => write!(
                f,
                "{} {}: {} = {} has no matching row in {}",
                entity.table_name(),
                id,
                column,
                target_id,
                target.table_name()
            ),
            Self::MissingKey { entity } => {
                write!(f, "{}: row without a primary key", entity.table_name())
            }
        }
    }
}

/// Scan every table and list the integrity violations, in table order
pub fn check_integrity<S: DataSource + ?Sized>(source: &S) -> ReportResult<Vec<IntegrityIssue>> {
    let mut tables = BTreeMap::new();
    for entity in EntityKind::ALL {
        tables.insert(entity, source.scan(entity)?);
    }

    let mut keys: BTreeMap<EntityKind, BTreeSet<i64>> = BTreeMap::new();
    let mut issues = Vec::new();

    for (entity, rows) in &tables {
        let seen = keys.entry(*entity).or_default();
        let mut reported = BTreeSet::new();
        for row in rows {
            match row.get("id").as_i64() {
                Some(id) => {
                    if !seen.insert(id) && reported.insert(id) {
                        issues.push(IntegrityIssue::DuplicateKey {
                            entity: *entity,
                            id,
                        });
                    }
                }
                None => issues.push(IntegrityIssue::MissingKey { entity: *entity }),
            }
        }
    }

    for (entity, rows) in &tables {
        let foreign_keys: Vec<_> = entity
            .columns()
            .iter()
            .filter_map(|c| c.references.map(|target| (c.name, target)))
            .collect();

        for row in rows {
            let id = row.get("id").as_i64().unwrap_or_default();
            for &(column, target) in &foreign_keys {
                let Some(target_id) = row.get(column).as_i64() else {
                    continue;
                };
                let resolves = keys.get(&target).is_some_and(|k| k.contains(&target_id));
                if !resolves {
                    issues.push(IntegrityIssue::DanglingReference {
                        entity: *entity,
                        id,
                        column,
                        target,
                        target_id,
                    });
                }
            }
        }
    }

    Ok(issues)
}
