//! Query plan evaluation
//!
//! Evaluation order mirrors SQL:
//!
//! 1. scan each table, applying its bound scan filters (WHERE on that table)
//! 2. equality joins in declaration order (hash index on the joined side)
//! 3. GROUP BY and row aggregates
//! 4. row-level derived measures (ratios)
//! 5. HAVING
//! 6. window measures (share of total over surviving groups)
//! 7. coercion to declared column types, decimals rounded to 2 places
//! 8. ORDER BY, tie-break, LIMIT
//!
//! SUM/AVG/MIN/MAX see each source row once, keyed by its position in its
//! table, so fan-out from sibling one-to-many joins never inflates them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::plan::{
    ColumnRef, CompareOp, Condition, Direction, JoinKind, Measure, QueryPlan, ScanFilter,
};
use super::record::Record;
use super::value::{ColumnType, Value, ValueKey};
use crate::error::ReportResult;
use crate::models::Money;
use crate::storage::DataSource;

static NULL: Value = Value::Null;

/// Name and type of an output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ColumnType,
}

/// Output of a plan: typed columns and ordered rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<Value>>,
}

/// Evaluate a plan against a data source
pub fn execute<S>(plan: &QueryPlan, source: &S, filters: &[ScanFilter]) -> ReportResult<ResultSet>
where
    S: DataSource + ?Sized,
{
    let tables = Tables::scan(plan, source, filters)?;
    let joined = tables.join(plan);
    debug!(rows = joined.len(), "joined rows");

    let columns: Vec<ColumnSpec> = plan
        .output_columns()
        .map(|(name, kind)| ColumnSpec { name, kind })
        .collect();
    let position = |name: &str| columns.iter().position(|c| c.name == name);

    let mut rows = tables.aggregate(plan, &joined);
    debug!(groups = rows.len(), "grouped");

    let measure_offset = plan.group_by.len();
    for (i, def) in plan.measures.iter().enumerate() {
        if let Measure::Ratio {
            numerator,
            denominator,
            scale,
        } = def.measure
        {
            let (n, d) = (position(numerator), position(denominator));
            for row in &mut rows {
                let num = n.and_then(|n| row[n].as_f64());
                let den = d.and_then(|d| row[d].as_f64());
                row[measure_offset + i] = match (num, den) {
                    (Some(num), Some(den)) if den != 0.0 => Value::Decimal(scale * num / den),
                    _ => Value::Null,
                };
            }
        }
    }

    if let Some(having) = &plan.having {
        let idx = position(having.column);
        rows.retain(|row| {
            idx.and_then(|i| row[i].as_f64())
                .is_some_and(|v| compare_op(having.op, v, having.value))
        });
    }

    for (i, def) in plan.measures.iter().enumerate() {
        if let Measure::ShareOfTotal { of } = def.measure {
            let idx = position(of);
            let total: f64 = rows
                .iter()
                .filter_map(|row| idx.and_then(|i| row[i].as_f64()))
                .sum();
            for row in &mut rows {
                let part = idx.and_then(|i| row[i].as_f64());
                row[measure_offset + i] = match part {
                    Some(part) if total != 0.0 => Value::Decimal(100.0 * part / total),
                    _ => Value::Null,
                };
            }
        }
    }

    for row in &mut rows {
        for (cell, spec) in row.iter_mut().zip(&columns) {
            *cell = std::mem::take(cell).coerce(spec.kind);
        }
    }

    let sort_keys: Vec<(Option<usize>, Direction)> = plan
        .order_by
        .iter()
        .map(|k| (position(k.column), k.direction))
        .chain([(position(plan.tie_break), Direction::Ascending)])
        .collect();
    let group_width = plan.group_by.len();
    rows.sort_by(|a, b| {
        for (idx, direction) in &sort_keys {
            if let Some(i) = idx {
                let ord = compare_directed(&a[*i], &b[*i], *direction);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
        // Fall back to the full group key so output never depends on input order
        let ka: Vec<ValueKey> = a[..group_width].iter().map(Value::key).collect();
        let kb: Vec<ValueKey> = b[..group_width].iter().map(Value::key).collect();
        ka.cmp(&kb)
    });

    if let Some(limit) = plan.limit {
        rows.truncate(limit);
    }

    debug!(rows = rows.len(), "result");
    Ok(ResultSet { columns, rows })
}

fn compare_op(op: CompareOp, left: f64, right: f64) -> bool {
    match op {
        CompareOp::GreaterThan => left > right,
        CompareOp::GreaterOrEqual => left >= right,
        CompareOp::LessThan => left < right,
        CompareOp::LessOrEqual => left <= right,
        CompareOp::Equal => left == right,
    }
}

/// Directed comparison that keeps nulls last either way
fn compare_directed(a: &Value, b: &Value, direction: Direction) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (false, false) => {
            let ord = a.compare(b).unwrap_or(Ordering::Equal);
            match direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        }
        _ => a.cmp_nulls_last(b),
    }
}

/// One joined row: for each alias, the index of the matching record, or
/// `None` where an outer join found nothing
type JoinedRow = Vec<Option<usize>>;

/// A column reference resolved to a table position
#[derive(Debug, Clone, Copy)]
struct Slot {
    table: Option<usize>,
    column: &'static str,
}

struct Tables {
    aliases: Vec<&'static str>,
    records: Vec<Vec<Record>>,
}

impl Tables {
    fn scan<S>(plan: &QueryPlan, source: &S, filters: &[ScanFilter]) -> ReportResult<Self>
    where
        S: DataSource + ?Sized,
    {
        let mut aliases = Vec::new();
        let mut records = Vec::new();
        for (alias, entity) in plan.aliases() {
            let mut rows = source.scan(entity)?;
            let scanned = rows.len();
            rows.retain(|record| {
                filters
                    .iter()
                    .filter(|f| f.alias == alias)
                    .all(|f| f.matches(record.get(f.column)))
            });
            debug!(%entity, alias, scanned, kept = rows.len(), "scan");
            aliases.push(alias);
            records.push(rows);
        }
        Ok(Self { aliases, records })
    }

    fn slot(&self, r: &ColumnRef) -> Slot {
        Slot {
            table: self.aliases.iter().position(|a| *a == r.alias),
            column: r.column,
        }
    }

    fn value<'a>(&'a self, row: &JoinedRow, slot: Slot) -> &'a Value {
        slot.table
            .and_then(|t| row.get(t).copied().flatten().map(|i| (t, i)))
            .map(|(t, i)| self.records[t][i].get(slot.column))
            .unwrap_or(&NULL)
    }

    fn join(&self, plan: &QueryPlan) -> Vec<JoinedRow> {
        let mut rows: Vec<JoinedRow> = (0..self.records[0].len()).map(|i| vec![Some(i)]).collect();

        for (n, join) in plan.joins.iter().enumerate() {
            let right = &self.records[n + 1];
            let mut index: HashMap<ValueKey, Vec<usize>> = HashMap::new();
            for (i, record) in right.iter().enumerate() {
                let key = record.get(join.right.column);
                if !key.is_null() {
                    index.entry(key.key()).or_default().push(i);
                }
            }

            let left = self.slot(&join.left);
            let mut next = Vec::with_capacity(rows.len());
            for row in rows {
                let key = self.value(&row, left);
                let matches = if key.is_null() {
                    None
                } else {
                    index.get(&key.key())
                };
                match matches {
                    Some(hits) => {
                        for &hit in hits {
                            let mut joined = row.clone();
                            joined.push(Some(hit));
                            next.push(joined);
                        }
                    }
                    None if join.kind == JoinKind::LeftOuter => {
                        let mut joined = row;
                        joined.push(None);
                        next.push(joined);
                    }
                    None => {}
                }
            }
            rows = next;
        }

        rows
    }

    /// GROUP BY and row aggregates; derived measure cells are left null
    fn aggregate(&self, plan: &QueryPlan, rows: &[JoinedRow]) -> Vec<Vec<Value>> {
        let keys: Vec<Slot> = plan.group_by.iter().map(|g| self.slot(&g.column)).collect();
        let mut groups: BTreeMap<Vec<ValueKey>, (Vec<Value>, Vec<Accumulator>)> = BTreeMap::new();

        for row in rows {
            let values: Vec<Value> = keys.iter().map(|k| self.value(row, *k).clone()).collect();
            let group_key: Vec<ValueKey> = values.iter().map(Value::key).collect();
            let (_, accs) = groups.entry(group_key).or_insert_with(|| {
                let accs = plan
                    .measures
                    .iter()
                    .map(|m| Accumulator::new(self, &m.measure))
                    .collect();
                (values, accs)
            });
            for acc in accs.iter_mut() {
                acc.update(self, row);
            }
        }

        groups
            .into_values()
            .map(|(mut values, accs)| {
                values.extend(accs.into_iter().map(Accumulator::finish));
                values
            })
            .collect()
    }
}

/// Row filter of a measure, resolved
#[derive(Debug, Clone)]
struct BoundCondition {
    slot: Slot,
    expected: Value,
}

impl BoundCondition {
    fn resolve(tables: &Tables, condition: Option<Condition>) -> Option<Self> {
        condition.map(|Condition::Equals(column, literal)| Self {
            slot: tables.slot(&column),
            expected: literal.to_value(),
        })
    }

    fn passes(condition: &Option<Self>, tables: &Tables, row: &JoinedRow) -> bool {
        match condition {
            None => true,
            Some(c) => tables.value(row, c.slot).compare(&c.expected) == Some(Ordering::Equal),
        }
    }
}

/// Running sum that stays exact for integers and money
#[derive(Debug, Default)]
struct Total {
    integer: i64,
    money: Money,
    decimal: f64,
    saw_money: bool,
    saw_decimal: bool,
}

impl Total {
    fn add(&mut self, value: &Value) {
        match value {
            Value::Integer(i) => self.integer += i,
            Value::Money(m) => {
                self.money += *m;
                self.saw_money = true;
            }
            other => {
                if let Some(x) = other.as_f64() {
                    self.decimal += x;
                    self.saw_decimal = true;
                }
            }
        }
    }

    fn value(&self) -> Value {
        match (self.saw_money, self.saw_decimal) {
            (false, false) => Value::Integer(self.integer),
            (true, false) if self.integer == 0 => Value::Money(self.money),
            _ => Value::Decimal(self.integer as f64 + self.money.as_decimal() + self.decimal),
        }
    }
}

#[derive(Debug)]
enum Accumulator {
    CountDistinct {
        of: Slot,
        filter: Option<BoundCondition>,
        seen: BTreeSet<ValueKey>,
    },
    Sum {
        of: Slot,
        filter: Option<BoundCondition>,
        rows: HashSet<usize>,
        contributed: bool,
        total: Total,
    },
    Avg {
        of: Slot,
        rows: HashSet<usize>,
        total: f64,
        count: u64,
    },
    Extreme {
        of: Slot,
        want: Ordering,
        best: Option<Value>,
    },
    Derived,
}

impl Accumulator {
    fn new(tables: &Tables, measure: &Measure) -> Self {
        match *measure {
            Measure::CountDistinct { of, filter } => Self::CountDistinct {
                of: tables.slot(&of),
                filter: BoundCondition::resolve(tables, filter),
                seen: BTreeSet::new(),
            },
            Measure::Sum { of, filter } => Self::Sum {
                of: tables.slot(&of),
                filter: BoundCondition::resolve(tables, filter),
                rows: HashSet::new(),
                contributed: false,
                total: Total::default(),
            },
            Measure::Avg { of } => Self::Avg {
                of: tables.slot(&of),
                rows: HashSet::new(),
                total: 0.0,
                count: 0,
            },
            Measure::Min { of } => Self::Extreme {
                of: tables.slot(&of),
                want: Ordering::Less,
                best: None,
            },
            Measure::Max { of } => Self::Extreme {
                of: tables.slot(&of),
                want: Ordering::Greater,
                best: None,
            },
            Measure::Ratio { .. } | Measure::ShareOfTotal { .. } => Self::Derived,
        }
    }

    fn update(&mut self, tables: &Tables, row: &JoinedRow) {
        match self {
            Self::CountDistinct { of, filter, seen } => {
                let value = tables.value(row, *of);
                if !value.is_null() && BoundCondition::passes(filter, tables, row) {
                    seen.insert(value.key());
                }
            }
            Self::Sum {
                of,
                filter,
                rows,
                contributed,
                total,
            } => {
                let Some(row_id) = source_row(row, *of) else {
                    return;
                };
                if !rows.insert(row_id) {
                    return;
                }
                let value = tables.value(row, *of);
                if value.is_null() {
                    return;
                }
                *contributed = true;
                if BoundCondition::passes(filter, tables, row) {
                    total.add(value);
                }
            }
            Self::Avg {
                of,
                rows,
                total,
                count,
            } => {
                let Some(row_id) = source_row(row, *of) else {
                    return;
                };
                if !rows.insert(row_id) {
                    return;
                }
                if let Some(x) = tables.value(row, *of).as_f64() {
                    *total += x;
                    *count += 1;
                }
            }
            Self::Extreme { of, want, best } => {
                let value = tables.value(row, *of);
                if value.is_null() {
                    return;
                }
                let replace = match best {
                    None => true,
                    Some(current) => value.compare(current) == Some(*want),
                };
                if replace {
                    *best = Some(value.clone());
                }
            }
            Self::Derived => {}
        }
    }

    fn finish(self) -> Value {
        match self {
            Self::CountDistinct { seen, .. } => Value::Integer(seen.len() as i64),
            Self::Sum {
                contributed, total, ..
            } => {
                if contributed {
                    total.value()
                } else {
                    Value::Null
                }
            }
            Self::Avg { total, count, .. } => {
                if count == 0 {
                    Value::Null
                } else {
                    Value::Decimal(total / count as f64)
                }
            }
            Self::Extreme { best, .. } => best.unwrap_or(Value::Null),
            Self::Derived => Value::Null,
        }
    }
}

/// Identity of the source row a slot reads from
fn source_row(row: &JoinedRow, slot: Slot) -> Option<usize> {
    slot.table.and_then(|t| row.get(t).copied().flatten())
}
