//! Report formatting for terminal output
//!
//! Report tables render as a grid with numeric columns right-aligned.
//! Nulls show as `-`.

use std::fmt::Write;

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::config::Settings;
use crate::models::Money;
use crate::query::{ColumnType, Value};
use crate::reports::{ReportDefinition, ReportTable};

const NULL_CELL: &str = "-";

/// How values are rendered for people
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
    /// Decimal columns rendered as money
    pub money_columns: &'static [&'static str],
}

impl DisplayOptions {
    pub fn new(settings: &Settings, definition: &ReportDefinition) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
            money_columns: definition.money_columns,
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            currency_symbol: settings.currency_symbol,
            date_format: settings.date_format,
            money_columns: &[],
        }
    }
}

/// Format one cell
pub fn format_cell(value: &Value, column: &str, options: &DisplayOptions) -> String {
    match value {
        Value::Null => NULL_CELL.to_string(),
        Value::Date(d) => {
            // A malformed user date format falls back to ISO
            let mut out = String::new();
            match write!(out, "{}", d.format(&options.date_format)) {
                Ok(()) => out,
                Err(_) => d.format("%Y-%m-%d").to_string(),
            }
        }
        Value::Decimal(x) if options.money_columns.contains(&column) => {
            let cents = (x * 100.0).round() as i64;
            Money::from_cents(cents).format_with_symbol(&options.currency_symbol)
        }
        Value::Money(m) => m.format_with_symbol(&options.currency_symbol),
        other => other.to_string(),
    }
}

/// Center a title over a block of the given width
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = if len >= width { 0 } else { (width - len) / 2 };
    format!("{}{}", " ".repeat(padding), title)
}

/// Format a report result as a grid with a title line
pub fn format_report_table(table: &ReportTable, title: &str, options: &DisplayOptions) -> String {
    if table.columns.is_empty() || table.is_empty() {
        return format!("{}\n\nNo rows.\n", title);
    }

    let mut builder = Builder::default();
    builder.push_record(table.column_names());
    for row in &table.rows {
        builder.push_record(
            row.iter()
                .zip(&table.columns)
                .map(|(value, column)| format_cell(value, column.name, options)),
        );
    }

    let mut grid = builder.build();
    grid.with(Style::rounded());
    for (i, column) in table.columns.iter().enumerate() {
        if column.kind != ColumnType::Text {
            grid.modify(Columns::single(i), Alignment::right());
        }
    }

    let rendered = grid.to_string();
    let width = rendered.lines().next().map_or(0, |l| l.chars().count());
    format!(
        "{}\n{}\n{} row(s)\n",
        format_header(title, width),
        rendered,
        table.len()
    )
}

/// Format the catalog as a table
pub fn format_report_list(reports: &[ReportDefinition]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Name", "Title", "Parameters"]);
    for report in reports {
        let params: Vec<&str> = report.parameters.iter().map(|p| p.name).collect();
        builder.push_record([
            report.name.to_string(),
            report.title.to_string(),
            params.join(", "),
        ]);
    }

    let mut grid = builder.build();
    grid.with(Style::sharp());
    format!("{}\n", grid)
}

/// Format one report's parameters and output columns
pub fn format_report_details(report: &ReportDefinition) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} ({})\n", report.title, report.name));
    output.push_str(&format!("  {}\n", report.description));
    if let Some(limit) = report.plan.limit {
        output.push_str(&format!("  Top {} rows only\n", limit));
    }

    output.push_str("\nParameters:\n");
    if report.parameters.is_empty() {
        output.push_str("  (none)\n");
    }
    for param in report.parameters {
        output.push_str(&format!(
            "  {:<12} {:<20} {}\n",
            param.name,
            param.kind.to_string(),
            param.description
        ));
    }

    output.push_str("\nColumns:\n");
    for (name, kind) in report.plan.output_columns() {
        output.push_str(&format!("  {:<28} {}\n", name, kind));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ColumnSpec;
    use crate::reports::{DEPARTMENT_FINANCIALS, HIGH_VALUE_PATIENTS, REPORTS};
    use chrono::NaiveDate;

    fn options() -> DisplayOptions {
        DisplayOptions {
            money_columns: DEPARTMENT_FINANCIALS.money_columns,
            ..DisplayOptions::default()
        }
    }

    #[test]
    fn test_format_cells() {
        let opts = options();
        assert_eq!(format_cell(&Value::Null, "TotalRevenue", &opts), "-");
        assert_eq!(
            format_cell(&Value::Decimal(1250.5), "TotalRevenue", &opts),
            "$1250.50"
        );
        assert_eq!(format_cell(&Value::Decimal(33.33), "CollectionRate", &opts), "33.33");
        assert_eq!(format_cell(&Value::Integer(4), "DoctorCount", &opts), "4");

        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let european = DisplayOptions {
            date_format: "%d.%m.%Y".into(),
            ..options()
        };
        assert_eq!(format_cell(&Value::Date(date), "FirstVisit", &european), "09.02.2024");
    }

    #[test]
    fn test_format_report_table() {
        let table = ReportTable {
            report: "department-financials",
            columns: vec![
                ColumnSpec {
                    name: "DepartmentName",
                    kind: ColumnType::Text,
                },
                ColumnSpec {
                    name: "TotalRevenue",
                    kind: ColumnType::Decimal,
                },
            ],
            rows: vec![vec![Value::text("Cardiology"), Value::Decimal(300.0)]],
        };

        let output = format_report_table(&table, "Department Financial Performance", &options());
        assert!(output.contains("DepartmentName"));
        assert!(output.contains("Cardiology"));
        assert!(output.contains("$300.00"));
        assert!(output.ends_with("1 row(s)\n"));
    }

    #[test]
    fn test_empty_table() {
        let table = ReportTable {
            report: "patient-status",
            columns: vec![],
            rows: vec![],
        };
        assert!(format_report_table(&table, "Patients", &options()).contains("No rows."));
    }

    #[test]
    fn test_report_list_and_details() {
        let list = format_report_list(REPORTS);
        for report in REPORTS {
            assert!(list.contains(report.name));
        }

        let details = format_report_details(&HIGH_VALUE_PATIENTS);
        assert!(details.contains("Top 15 rows only"));
        assert!(details.contains("status"));
        assert!(details.contains("LastVisit"));
        assert!(details.contains("date"));
    }
}
