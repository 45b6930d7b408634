//! Declarative query plans
//!
//! A [`QueryPlan`] is plain data: the tables to scan and join, how to group,
//! what to measure, how to filter after aggregation, how to order and where
//! to cut off. All parts are `&'static` so a plan can be a `const`.

use chrono::NaiveDate;

use super::value::{ColumnType, Value};
use crate::models::EntityKind;

/// A column of a joined table, addressed by table alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub alias: &'static str,
    pub column: &'static str,
}

/// Shorthand constructor for [`ColumnRef`]
pub const fn col(alias: &'static str, column: &'static str) -> ColumnRef {
    ColumnRef { alias, column }
}

/// The driving table of a plan
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub entity: EntityKind,
    pub alias: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    /// Preserve left rows with no match; the right side reads as null
    LeftOuter,
}

/// An equality join of a new table onto the rows built so far
#[derive(Debug, Clone, Copy)]
pub struct Join {
    pub entity: EntityKind,
    pub alias: &'static str,
    pub kind: JoinKind,
    /// Column of a table already in the plan
    pub left: ColumnRef,
    /// Column of the table being joined
    pub right: ColumnRef,
}

/// Literal operand in a row condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Text(&'static str),
    Integer(i64),
}

impl Literal {
    pub fn to_value(self) -> Value {
        match self {
            Self::Text(s) => Value::text(s),
            Self::Integer(i) => Value::Integer(i),
        }
    }
}

/// Row-level condition restricting which joined rows feed a measure
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Equals(ColumnRef, Literal),
}

/// A grouping column and the output column it becomes
#[derive(Debug, Clone, Copy)]
pub struct GroupKey {
    pub column: ColumnRef,
    pub output: &'static str,
    pub kind: ColumnType,
}

/// What an output measure computes
#[derive(Debug, Clone, Copy)]
pub enum Measure {
    /// COUNT(DISTINCT col), optionally over rows matching a condition
    CountDistinct {
        of: ColumnRef,
        filter: Option<Condition>,
    },
    /// SUM(col) over distinct source rows, optionally filtered
    Sum {
        of: ColumnRef,
        filter: Option<Condition>,
    },
    /// AVG(col) over distinct source rows
    Avg { of: ColumnRef },
    Min { of: ColumnRef },
    Max { of: ColumnRef },
    /// `scale * numerator / denominator` over earlier outputs of the same row;
    /// null when the denominator is zero or null
    Ratio {
        numerator: &'static str,
        denominator: &'static str,
        scale: f64,
    },
    /// Window-style share: `100 * value / sum(value over all rows)`
    ShareOfTotal { of: &'static str },
}

impl Measure {
    /// Computed from aggregated rows rather than from joined rows
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::Ratio { .. } | Self::ShareOfTotal { .. })
    }

    /// Needs every grouped row (and runs after the post-aggregation filter)
    pub fn is_window(&self) -> bool {
        matches!(self, Self::ShareOfTotal { .. })
    }
}

/// A named, typed measure
#[derive(Debug, Clone, Copy)]
pub struct MeasureDef {
    pub output: &'static str,
    pub kind: ColumnType,
    pub measure: Measure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Equal,
}

/// Post-aggregation filter on an output column (HAVING)
#[derive(Debug, Clone, Copy)]
pub struct Having {
    pub column: &'static str,
    pub op: CompareOp,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: Direction,
}

/// A complete declarative query
#[derive(Debug, Clone, Copy)]
pub struct QueryPlan {
    pub from: Source,
    pub joins: &'static [Join],
    pub group_by: &'static [GroupKey],
    pub measures: &'static [MeasureDef],
    pub having: Option<Having>,
    pub order_by: &'static [SortKey],
    /// Output column sorted ascending after `order_by` to break ties
    pub tie_break: &'static str,
    pub limit: Option<usize>,
}

impl QueryPlan {
    /// Aliases in join order, driving table first
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, EntityKind)> + '_ {
        std::iter::once((self.from.alias, self.from.entity))
            .chain(self.joins.iter().map(|j| (j.alias, j.entity)))
    }

    /// Entity bound to an alias
    pub fn entity_for(&self, alias: &str) -> Option<EntityKind> {
        self.aliases().find(|(a, _)| *a == alias).map(|(_, e)| e)
    }

    /// Output column names in order: group keys, then measures
    pub fn output_columns(&self) -> impl Iterator<Item = (&'static str, ColumnType)> + '_ {
        self.group_by
            .iter()
            .map(|g| (g.output, g.kind))
            .chain(self.measures.iter().map(|m| (m.output, m.kind)))
    }

    fn is_window_output(&self, name: &str) -> bool {
        self.measures
            .iter()
            .any(|m| m.output == name && m.measure.is_window())
    }

    /// Check the plan is internally consistent
    ///
    /// Every column reference must name a known alias and a declared column,
    /// every join must reference an alias joined earlier, derived measures
    /// may only reference earlier outputs, and HAVING may not reference a
    /// window measure.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: Vec<&str> = vec![self.from.alias];
        for join in self.joins {
            if seen.contains(&join.alias) {
                return Err(format!("alias '{}' declared twice", join.alias));
            }
            if !seen.contains(&join.left.alias) {
                return Err(format!(
                    "join '{}' references '{}' before it is joined",
                    join.alias, join.left.alias
                ));
            }
            if join.right.alias != join.alias {
                return Err(format!("join '{}' right side must be its own column", join.alias));
            }
            seen.push(join.alias);
        }

        let check_ref = |r: &ColumnRef| -> Result<(), String> {
            let entity = self
                .entity_for(r.alias)
                .ok_or_else(|| format!("unknown alias '{}'", r.alias))?;
            entity
                .column(r.column)
                .map(|_| ())
                .ok_or_else(|| format!("{} has no column '{}'", entity, r.column))
        };

        for join in self.joins {
            check_ref(&join.left)?;
            check_ref(&join.right)?;
        }
        for key in self.group_by {
            check_ref(&key.column)?;
        }

        let mut outputs: Vec<&str> = self.group_by.iter().map(|g| g.output).collect();
        for def in self.measures {
            match def.measure {
                Measure::CountDistinct { of, filter } | Measure::Sum { of, filter } => {
                    check_ref(&of)?;
                    if let Some(Condition::Equals(c, _)) = filter {
                        check_ref(&c)?;
                    }
                }
                Measure::Avg { of } | Measure::Min { of } | Measure::Max { of } => check_ref(&of)?,
                Measure::Ratio {
                    numerator,
                    denominator,
                    ..
                } => {
                    for name in [numerator, denominator] {
                        if !outputs.contains(&name) {
                            return Err(format!("'{}' references unknown output '{}'", def.output, name));
                        }
                        if self.is_window_output(name) {
                            return Err(format!("'{}' cannot reference window output '{}'", def.output, name));
                        }
                    }
                }
                Measure::ShareOfTotal { of } => {
                    if !outputs.contains(&of) {
                        return Err(format!("'{}' references unknown output '{}'", def.output, of));
                    }
                }
            }
            if outputs.contains(&def.output) {
                return Err(format!("output '{}' declared twice", def.output));
            }
            outputs.push(def.output);
        }

        if let Some(having) = &self.having {
            if !outputs.contains(&having.column) {
                return Err(format!("HAVING references unknown output '{}'", having.column));
            }
            if self.is_window_output(having.column) {
                return Err(format!("HAVING cannot reference window output '{}'", having.column));
            }
        }

        for key in self.order_by.iter().map(|k| k.column).chain([self.tie_break]) {
            if !outputs.contains(&key) {
                return Err(format!("ORDER BY references unknown output '{}'", key));
            }
        }

        Ok(())
    }
}

/// Predicate applied to a table's rows before joining
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPredicate {
    Equals(Value),
    OnOrAfter(NaiveDate),
    OnOrBefore(NaiveDate),
}

/// A predicate bound to one alias of a plan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFilter {
    pub alias: &'static str,
    pub column: &'static str,
    pub predicate: ScanPredicate,
}

impl ScanFilter {
    /// Evaluate against a value; null never matches
    pub fn matches(&self, value: &Value) -> bool {
        use std::cmp::Ordering;

        match &self.predicate {
            ScanPredicate::Equals(expected) => value.compare(expected) == Some(Ordering::Equal),
            ScanPredicate::OnOrAfter(date) => matches!(
                value.compare(&Value::Date(*date)),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            ScanPredicate::OnOrBefore(date) => matches!(
                value.compare(&Value::Date(*date)),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}
