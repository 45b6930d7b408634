//! In-memory copy of every table

use serde::{Deserialize, Serialize};

use super::integrity::{check_integrity, IntegrityIssue};
use super::DataSource;
use crate::error::ReportResult;
use crate::models::{
    Appointment, Billing, Department, Doctor, EntityKind, Patient, TableRow, Treatment,
};
use crate::query::Record;

/// All six tables held in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub departments: Vec<Department>,
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub treatments: Vec<Treatment>,
    pub billing: Vec<Billing>,
}

impl Snapshot {
    /// Number of rows in a table
    pub fn row_count(&self, entity: EntityKind) -> usize {
        match entity {
            EntityKind::Department => self.departments.len(),
            EntityKind::Doctor => self.doctors.len(),
            EntityKind::Patient => self.patients.len(),
            EntityKind::Appointment => self.appointments.len(),
            EntityKind::Treatment => self.treatments.len(),
            EntityKind::Billing => self.billing.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|e| self.row_count(*e) == 0)
    }

    /// Duplicate keys and dangling references across the tables
    pub fn integrity_issues(&self) -> ReportResult<Vec<IntegrityIssue>> {
        check_integrity(self)
    }
}

fn records<T: TableRow>(rows: &[T]) -> Vec<Record> {
    rows.iter().map(TableRow::to_record).collect()
}

impl DataSource for Snapshot {
    fn scan(&self, entity: EntityKind) -> ReportResult<Vec<Record>> {
        Ok(match entity {
            EntityKind::Department => records(&self.departments),
            EntityKind::Doctor => records(&self.doctors),
            EntityKind::Patient => records(&self.patients),
            EntityKind::Appointment => records(&self.appointments),
            EntityKind::Treatment => records(&self.treatments),
            EntityKind::Billing => records(&self.billing),
        })
    }
}
