//! CSV export of report results

use std::io::Write;

use crate::error::{HospitalError, HospitalResult};
use crate::reports::ReportTable;

/// Write a header row and one record per result row
///
/// Decimals carry two places, dates are `YYYY-MM-DD` and nulls are empty.
pub fn export_report_csv<W: Write>(table: &ReportTable, writer: &mut W) -> HospitalResult<()> {
    let mut out = ::csv::Writer::from_writer(writer);

    out.write_record(table.column_names())
        .map_err(|e| HospitalError::Export(e.to_string()))?;

    for row in &table.rows {
        out.write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| HospitalError::Export(e.to_string()))?;
    }

    out.flush().map_err(|e| HospitalError::Export(e.to_string()))?;
    Ok(())
}
