//! YAML export of report results

use std::io::Write;

use crate::error::{HospitalError, HospitalResult};
use crate::reports::{ReportTable, RowView};

/// Write the rows as a YAML sequence of mappings, after a comment header
pub fn export_report_yaml<W: Write>(table: &ReportTable, writer: &mut W) -> HospitalResult<()> {
    writeln!(writer, "# hospital-reports: {}", table.report)
        .map_err(|e| HospitalError::Export(e.to_string()))?;
    writeln!(writer, "# Rows: {}", table.len())
        .map_err(|e| HospitalError::Export(e.to_string()))?;

    let rows: Vec<RowView<'_>> = table.records().collect();
    serde_yaml::to_writer(writer, &rows).map_err(|e| HospitalError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn test_yaml_export() {
        let mut out = Vec::new();
        export_report_yaml(&fixtures::table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# hospital-reports: high-value-patients\n# Rows: 2\n"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        let rows = parsed.as_sequence().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["PatientName"].as_str(), Some("Chloe Martin"));
        assert!(rows[1]["AssignedDoctor"].is_null());
        assert_eq!(rows[0]["AppointmentCount"].as_i64(), Some(2));
    }
}
