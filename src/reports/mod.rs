//! Reports module for hospital-reports
//!
//! The catalog of canonical reports over the hospital schema:
//! doctor workload, patient status distribution, department financial
//! performance and high-value patients.

pub mod catalog;
pub mod definitions;
pub mod parameters;
pub mod table;

pub use catalog::ReportCatalog;
pub use definitions::{
    ReportDefinition, DEPARTMENT_FINANCIALS, DOCTOR_WORKLOAD, HIGH_VALUE_LIMIT,
    HIGH_VALUE_PATIENTS, PATIENT_STATUS, REPORTS,
};
pub use parameters::{Bound, ParameterKind, ParameterSpec, ReportParameters, DATE_FORMAT};
pub use table::{ReportTable, RowView};
