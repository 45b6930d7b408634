//! Core data models for hospital-reports
//!
//! The six entities of the hospital schema, their typed identifiers and the
//! table metadata shared with the query engine and the DDL renderer.

pub mod appointment;
pub mod billing;
pub mod department;
pub mod doctor;
pub mod entity;
pub mod ids;
pub mod money;
pub mod patient;
pub mod treatment;

pub use appointment::{Appointment, AppointmentStatus};
pub use billing::{Billing, PaymentStatus};
pub use department::Department;
pub use doctor::Doctor;
pub use entity::{ColumnDef, EntityKind, SqlType, TableRow};
pub use ids::{AppointmentId, BillingId, DepartmentId, DoctorId, PatientId, TreatmentId};
pub use money::Money;
pub use patient::{Patient, PatientStatus};
pub use treatment::Treatment;
