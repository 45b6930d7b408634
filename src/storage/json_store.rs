//! JSON file store
//!
//! One file per table under the data directory, each a JSON array of rows.
//! Every scan re-reads its file, so a report always sees what is on disk.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::file_io::{read_json_required, write_json_atomic};
use super::snapshot::Snapshot;
use super::DataSource;
use crate::config::paths::HospitalPaths;
use crate::error::{HospitalError, HospitalResult, ReportError, ReportResult};
use crate::models::{EntityKind, TableRow};
use crate::query::Record;

/// Read-through store over `data/<table>.json`
#[derive(Debug, Clone)]
pub struct JsonStore {
    paths: HospitalPaths,
}

impl JsonStore {
    pub fn new(paths: HospitalPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &HospitalPaths {
        &self.paths
    }

    /// Path of the file backing a table
    pub fn table_file(&self, entity: EntityKind) -> PathBuf {
        self.paths.table_file(entity)
    }

    fn load<T: DeserializeOwned>(&self, entity: EntityKind) -> HospitalResult<Vec<T>> {
        let path = self.table_file(entity);
        let rows: Vec<T> = read_json_required(&path)?;
        debug!(%entity, path = %path.display(), rows = rows.len(), "loaded table");
        Ok(rows)
    }

    fn load_records<T: DeserializeOwned + TableRow>(&self) -> HospitalResult<Vec<Record>> {
        let rows: Vec<T> = self.load(T::KIND)?;
        Ok(rows.iter().map(TableRow::to_record).collect())
    }

    /// Read every table into memory
    pub fn load_snapshot(&self) -> HospitalResult<Snapshot> {
        Ok(Snapshot {
            departments: self.load(EntityKind::Department)?,
            doctors: self.load(EntityKind::Doctor)?,
            patients: self.load(EntityKind::Patient)?,
            appointments: self.load(EntityKind::Appointment)?,
            treatments: self.load(EntityKind::Treatment)?,
            billing: self.load(EntityKind::Billing)?,
        })
    }

    /// Replace every table file with the contents of a snapshot
    pub fn write_snapshot(&self, snapshot: &Snapshot) -> HospitalResult<()> {
        self.paths.ensure_directories()?;
        write_json_atomic(self.table_file(EntityKind::Department), &snapshot.departments)?;
        write_json_atomic(self.table_file(EntityKind::Doctor), &snapshot.doctors)?;
        write_json_atomic(self.table_file(EntityKind::Patient), &snapshot.patients)?;
        write_json_atomic(self.table_file(EntityKind::Appointment), &snapshot.appointments)?;
        write_json_atomic(self.table_file(EntityKind::Treatment), &snapshot.treatments)?;
        write_json_atomic(self.table_file(EntityKind::Billing), &snapshot.billing)?;
        info!(dir = %self.paths.data_dir().display(), "wrote dataset");
        Ok(())
    }
}

/// Storage failures keep their own message when surfaced to report callers
fn unavailable(err: HospitalError) -> ReportError {
    match err {
        HospitalError::Storage(message) | HospitalError::Io(message) => {
            ReportError::source_unavailable(message)
        }
        HospitalError::Report(err) => err,
        other => ReportError::source_unavailable(other.to_string()),
    }
}

impl DataSource for JsonStore {
    fn scan(&self, entity: EntityKind) -> ReportResult<Vec<Record>> {
        use crate::models::{Appointment, Billing, Department, Doctor, Patient, Treatment};

        let records = match entity {
            EntityKind::Department => self.load_records::<Department>(),
            EntityKind::Doctor => self.load_records::<Doctor>(),
            EntityKind::Patient => self.load_records::<Patient>(),
            EntityKind::Appointment => self.load_records::<Appointment>(),
            EntityKind::Treatment => self.load_records::<Treatment>(),
            EntityKind::Billing => self.load_records::<Billing>(),
        };
        records.map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportErrorKind;
    use crate::models::{
        Appointment, AppointmentStatus, Billing, Department, Doctor, Money, PaymentStatus,
        Treatment,
    };
    use crate::query::Value;
    use crate::reports::{ReportCatalog, ReportParameters};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HospitalPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, JsonStore::new(paths))
    }

    #[test]
    fn test_round_trip_snapshot() {
        let (_temp_dir, store) = store();
        let mut snapshot = Snapshot::default();
        snapshot.departments = vec![Department::new(1, "Cardiology")];
        snapshot.doctors = vec![Doctor::new(1, "Dr. A", "Cardiology").in_department(1.into())];

        store.write_snapshot(&snapshot).unwrap();
        assert!(store.paths().has_dataset());
        assert_eq!(store.load_snapshot().unwrap(), snapshot);

        let doctors = store.scan(EntityKind::Doctor).unwrap();
        assert_eq!(doctors[0].get("department_id"), &Value::Integer(1));
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let (_temp_dir, store) = store();

        let err = store.scan(EntityKind::Patient).unwrap_err();
        assert_eq!(err.kind, ReportErrorKind::SourceUnavailable);
        assert!(err.message.starts_with("File not found"));
    }

    #[test]
    fn test_corrupt_file_is_source_unavailable() {
        let (_temp_dir, store) = store();
        store.write_snapshot(&Snapshot::default()).unwrap();
        std::fs::write(store.table_file(EntityKind::Billing), "[{\"id\": ").unwrap();

        let err = store.scan(EntityKind::Billing).unwrap_err();
        assert!(err.is_source_unavailable());
        assert!(err.message.contains("Failed to parse"));
        // Other tables are unaffected
        assert!(store.scan(EntityKind::Department).unwrap().is_empty());
    }

    #[test]
    fn test_amounts_stored_as_decimals() {
        let (_temp_dir, store) = store();
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let mut snapshot = Snapshot::default();
        snapshot.appointments = vec![Appointment::new(
            1,
            1.into(),
            1.into(),
            date,
            AppointmentStatus::Completed,
        )];
        snapshot.treatments = vec![Treatment::new(1, 1.into(), "ECG", Money::from_cents(7550))];
        snapshot.billing = vec![Billing::new(
            1,
            1.into(),
            Money::from_cents(10050),
            PaymentStatus::Paid,
        )];

        store.write_snapshot(&snapshot).unwrap();
        let text = std::fs::read_to_string(store.table_file(EntityKind::Billing)).unwrap();
        assert!(text.contains("\"total_amount\": 100.5"), "{}", text);
        assert_eq!(store.load_snapshot().unwrap(), snapshot);

        let treatments = store.scan(EntityKind::Treatment).unwrap();
        assert_eq!(treatments[0].get("cost"), &Value::Money(Money::from_cents(7550)));
    }

    #[test]
    fn test_externally_loaded_amounts_read_as_currency_units() {
        let (_temp_dir, store) = store();
        store.write_snapshot(&Snapshot::default()).unwrap();

        let files = [
            (EntityKind::Department, r#"[{"id": 1, "name": "Cardiology"}]"#),
            (
                EntityKind::Doctor,
                r#"[{"id": 1, "name": "Dr. A", "specialty": "Cardiologist", "department_id": 1}]"#,
            ),
            (
                EntityKind::Appointment,
                r#"[
                    {"id": 1, "patient_id": 1, "doctor_id": 1, "date": "2024-01-05", "status": "Completed"},
                    {"id": 2, "patient_id": 1, "doctor_id": 1, "date": "2024-01-06", "status": "Completed"}
                ]"#,
            ),
            (
                EntityKind::Billing,
                r#"[
                    {"id": 1, "appointment_id": 1, "total_amount": 100, "amount_paid": 100, "payment_status": "Paid"},
                    {"id": 2, "appointment_id": 2, "total_amount": 200.50, "amount_paid": 0, "payment_status": "Pending"}
                ]"#,
            ),
        ];
        for (entity, json) in files {
            std::fs::write(store.table_file(entity), json).unwrap();
        }

        let table = ReportCatalog::new(store)
            .run_report("department-financials", &ReportParameters::new())
            .unwrap();
        assert_eq!(table.cell(0, "TotalRevenue"), Some(&Value::Decimal(300.5)));
        assert_eq!(table.cell(0, "CollectedRevenue"), Some(&Value::Decimal(100.0)));
    }
}
