//! JSON export of report results

use std::io::Write;

use crate::error::{HospitalError, HospitalResult};
use crate::reports::{ReportTable, RowView};

/// Write the rows as a pretty-printed JSON array of objects
pub fn export_report_json<W: Write>(table: &ReportTable, writer: &mut W) -> HospitalResult<()> {
    let rows: Vec<RowView<'_>> = table.records().collect();
    serde_json::to_writer_pretty(&mut *writer, &rows)
        .map_err(|e| HospitalError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| HospitalError::Export(e.to_string()))?;
    Ok(())
}
