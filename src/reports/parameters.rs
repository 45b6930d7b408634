//! Report parameters
//!
//! Callers pass raw `name -> text` pairs. Each report declares the
//! parameters it accepts; binding checks every supplied value against its
//! declaration and turns it into a scan filter on the table it restricts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{ReportError, ReportResult};
use crate::models::{EntityKind, PatientStatus};
use crate::query::{ColumnRef, ScanFilter, ScanPredicate, Value};
use crate::storage::DataSource;

/// Date format accepted by date parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// What a parameter value must be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Integer id of an existing row of the entity
    EntityId(EntityKind),
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// One of the patient status values
    PatientStatus,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityId(entity) => write!(f, "{} id", entity),
            Self::Date => write!(f, "date (YYYY-MM-DD)"),
            Self::PatientStatus => write!(f, "patient status"),
        }
    }
}

/// How the value restricts the target column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Equals,
    OnOrAfter,
    OnOrBefore,
}

/// A parameter a report accepts
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParameterKind,
    /// Column of the report's plan the value restricts
    pub target: ColumnRef,
    pub bound: Bound,
}

/// Raw parameter values keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportParameters {
    values: BTreeMap<String, String>,
}

impl ReportParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a value; names are matched case-insensitively
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().trim().to_lowercase();
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse `name=value` pairs as given on the command line
    pub fn parse_pairs<I, T>(pairs: I) -> ReportResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut params = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| reject(pair, "expected name=value"))?;
            if name.trim().is_empty() {
                return Err(reject(pair, "missing parameter name"));
            }
            params.insert(name, value.trim());
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReportParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

fn reject(name: &str, reason: impl fmt::Display) -> ReportError {
    let err = ReportError::invalid_parameter(name, reason);
    warn!(parameter = name, error = %err.message, "rejected parameter");
    err
}

/// Validate supplied values against the declared parameters and turn them
/// into scan filters
///
/// Id parameters must name an existing row, so binding may scan the source.
pub fn bind<S>(
    specs: &[ParameterSpec],
    params: &ReportParameters,
    source: &S,
) -> ReportResult<Vec<ScanFilter>>
where
    S: DataSource + ?Sized,
{
    let mut filters = Vec::with_capacity(params.len());
    let mut range: (Option<NaiveDate>, Option<NaiveDate>) = (None, None);

    for (name, raw) in params.iter() {
        let spec = specs
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| reject(name, "not accepted by this report"))?;

        let raw = raw.trim();
        if raw.is_empty() {
            return Err(reject(name, "value is empty"));
        }

        let value = match spec.kind {
            ParameterKind::EntityId(entity) => {
                let id: i64 = raw
                    .parse()
                    .map_err(|_| reject(name, format!("expected an integer id, got '{}'", raw)))?;
                let exists = source
                    .scan(entity)?
                    .iter()
                    .any(|record| record.get("id").as_i64() == Some(id));
                if !exists {
                    return Err(reject(name, format!("no {} with id {}", entity, id)));
                }
                Value::Integer(id)
            }
            ParameterKind::Date => {
                let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                    reject(name, format!("expected a date as YYYY-MM-DD, got '{}'", raw))
                })?;
                match spec.bound {
                    Bound::OnOrAfter => range.0 = Some(date),
                    Bound::OnOrBefore => range.1 = Some(date),
                    Bound::Equals => {}
                }
                Value::Date(date)
            }
            ParameterKind::PatientStatus => {
                let status: PatientStatus = raw.parse().map_err(|e: String| reject(name, e))?;
                Value::text(status.to_string())
            }
        };

        let predicate = match (spec.bound, &value) {
            (Bound::OnOrAfter, Value::Date(d)) => ScanPredicate::OnOrAfter(*d),
            (Bound::OnOrBefore, Value::Date(d)) => ScanPredicate::OnOrBefore(*d),
            _ => ScanPredicate::Equals(value),
        };
        filters.push(ScanFilter {
            alias: spec.target.alias,
            column: spec.target.column,
            predicate,
        });
    }

    if let (Some(from), Some(to)) = range {
        if from > to {
            return Err(reject("from", format!("{} is after 'to' ({})", from, to)));
        }
    }

    Ok(filters)
}
