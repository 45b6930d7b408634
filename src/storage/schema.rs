//! `CREATE TABLE` rendering from the table metadata

use crate::models::{ColumnDef, EntityKind};

fn column_line(column: &ColumnDef) -> String {
    let mut line = format!("{} {}", column.name, column.sql_type);
    if column.primary_key {
        line.push_str(" PRIMARY KEY");
    } else if !column.nullable {
        line.push_str(" NOT NULL");
    }
    if !column.allowed.is_empty() {
        let quoted: Vec<String> = column.allowed.iter().map(|v| format!("'{}'", v)).collect();
        line.push_str(&format!(" CHECK ({} IN ({}))", column.name, quoted.join(", ")));
    }
    line
}

/// DDL for one table
pub fn render_table(entity: EntityKind) -> String {
    let mut lines: Vec<String> = entity.columns().iter().map(column_line).collect();
    for column in entity.columns() {
        if let Some(target) = column.references {
            lines.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}(id)",
                column.name,
                target.table_name()
            ));
        }
    }

    let mut ddl = format!("CREATE TABLE {} (\n", entity.table_name());
    ddl.push_str(
        &lines
            .iter()
            .map(|l| format!("    {}", l))
            .collect::<Vec<_>>()
            .join(",\n"),
    );
    ddl.push_str("\n);\n");
    ddl
}

/// DDL for the whole schema, referenced tables first
pub fn render_schema() -> String {
    EntityKind::ALL
        .iter()
        .map(|e| render_table(*e))
        .collect::<Vec<_>>()
        .join("\n")
}
