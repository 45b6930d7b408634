//! The report catalog
//!
//! [`ReportCatalog`] is the single entry point for running reports. It holds
//! no state besides its data source: each run looks up a static definition,
//! binds the caller's parameters, evaluates the plan and returns the whole
//! table or an error, never a partial result.

use tracing::{debug, info};

use super::definitions::{self, ReportDefinition, REPORTS};
use super::parameters::{bind, ReportParameters};
use super::table::ReportTable;
use crate::error::{ReportError, ReportResult};
use crate::query::execute;
use crate::storage::DataSource;

/// Runs the canonical reports against a data source
#[derive(Debug, Clone)]
pub struct ReportCatalog<S> {
    source: S,
}

impl<S: DataSource> ReportCatalog<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Report names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        REPORTS.iter().map(|r| r.name)
    }

    pub fn definitions(&self) -> &'static [ReportDefinition] {
        REPORTS
    }

    /// Look up a report; names are case-insensitive and `_` reads as `-`
    pub fn definition(&self, name: &str) -> ReportResult<&'static ReportDefinition> {
        definitions::find(name).ok_or_else(|| ReportError::report_not_found(name.trim()))
    }

    /// Run a report
    ///
    /// # Errors
    ///
    /// - `NotFound` if no report has this name
    /// - `InvalidParameter` if a parameter is not accepted by the report, is
    ///   malformed, or names a row that does not exist
    /// - `SourceUnavailable` if the data source fails
    pub fn run_report(&self, name: &str, params: &ReportParameters) -> ReportResult<ReportTable> {
        let definition = self.definition(name)?;
        debug_assert!(definition.plan.validate().is_ok(), "{}", definition.name);

        let filters = bind(definition.parameters, params, &self.source)?;
        debug!(report = definition.name, filters = filters.len(), "bound parameters");

        let result = execute(&definition.plan, &self.source, &filters)?;
        info!(report = definition.name, rows = result.rows.len(), "report complete");

        Ok(ReportTable::new(definition.name, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportErrorKind;
    use crate::models::{
        Appointment, AppointmentStatus, Billing, Department, Doctor, EntityKind, Money, Patient,
        PatientStatus, PaymentStatus, Treatment,
    };
    use crate::query::{Record, Value};
    use crate::storage::{sample_snapshot, Snapshot};
    use chrono::NaiveDate;

    fn day(month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, d).unwrap()
    }

    fn no_params() -> ReportParameters {
        ReportParameters::new()
    }

    /// Cardiology with Dr. A: one $100 Paid bill and one $200 Pending bill
    fn cardiology() -> Snapshot {
        let mut s = Snapshot::default();
        s.departments = vec![Department::new(1, "Cardiology")];
        s.doctors = vec![Doctor::new(1, "Dr. A", "Cardiologist").in_department(1.into())];
        s.patients = vec![
            Patient::new(1, "Patient One", PatientStatus::Stable).assigned_to(1.into()),
            Patient::new(2, "Patient Two", PatientStatus::Critical).assigned_to(1.into()),
        ];
        s.appointments = vec![
            Appointment::new(1, 1.into(), 1.into(), day(1, 5), AppointmentStatus::Completed),
            Appointment::new(2, 2.into(), 1.into(), day(1, 6), AppointmentStatus::Completed),
        ];
        s.billing = vec![
            Billing::new(1, 1.into(), Money::from_units(100), PaymentStatus::Paid),
            Billing::new(2, 2.into(), Money::from_units(200), PaymentStatus::Pending),
        ];
        s
    }

    fn sample() -> ReportCatalog<Snapshot> {
        ReportCatalog::new(sample_snapshot().unwrap())
    }

    fn decimal(v: &Value) -> f64 {
        v.as_f64().unwrap()
    }

    #[test]
    fn test_cardiology_collection_rate() {
        let catalog = ReportCatalog::new(cardiology());
        let table = catalog
            .run_report("department-financials", &no_params())
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "DepartmentName"), Some(&Value::text("Cardiology")));
        assert_eq!(table.cell(0, "DoctorCount"), Some(&Value::Integer(1)));
        assert_eq!(table.cell(0, "AppointmentCount"), Some(&Value::Integer(2)));
        assert_eq!(table.cell(0, "TotalRevenue"), Some(&Value::Decimal(300.0)));
        assert_eq!(table.cell(0, "AvgRevenuePerAppointment"), Some(&Value::Decimal(150.0)));
        assert_eq!(table.cell(0, "CollectedRevenue"), Some(&Value::Decimal(100.0)));
        assert_eq!(table.cell(0, "CollectionRate"), Some(&Value::Decimal(33.33)));
    }

    #[test]
    fn test_every_report_is_deterministic() {
        let catalog = sample();
        for name in catalog.names() {
            let first = catalog.run_report(name, &no_params()).unwrap();
            let second = catalog.run_report(name, &no_params()).unwrap();
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap(),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_input_order_does_not_change_output() {
        let forward = sample_snapshot().unwrap();
        let mut reversed = forward.clone();
        reversed.doctors.reverse();
        reversed.patients.reverse();
        reversed.appointments.reverse();
        reversed.billing.reverse();

        for report in REPORTS {
            let a = ReportCatalog::new(&forward)
                .run_report(report.name, &no_params())
                .unwrap();
            let b = ReportCatalog::new(&reversed)
                .run_report(report.name, &no_params())
                .unwrap();
            assert_eq!(a, b, "{}", report.name);
        }
    }

    #[test]
    fn test_doctor_without_appointments_is_kept() {
        let mut s = cardiology();
        s.doctors.push(Doctor::new(2, "Dr. Idle", "Cardiologist").in_department(1.into()));
        let table = ReportCatalog::new(s)
            .run_report("doctor-workload", &no_params())
            .unwrap();

        assert_eq!(table.len(), 2);
        // Null revenue sorts after any real revenue
        assert_eq!(table.cell(1, "DoctorName"), Some(&Value::text("Dr. Idle")));
        assert_eq!(table.cell(1, "PatientCount"), Some(&Value::Integer(0)));
        assert_eq!(table.cell(1, "AppointmentCount"), Some(&Value::Integer(0)));
        assert_eq!(table.cell(1, "AvgBilled"), Some(&Value::Null));
        assert_eq!(table.cell(1, "TotalRevenue"), Some(&Value::Null));

        assert_eq!(table.cell(0, "PatientCount"), Some(&Value::Integer(2)));
        assert_eq!(table.cell(0, "TotalRevenue"), Some(&Value::Decimal(300.0)));
        assert_eq!(table.cell(0, "AvgBilled"), Some(&Value::Decimal(150.0)));
        assert_eq!(table.cell(0, "Department"), Some(&Value::text("Cardiology")));
    }

    #[test]
    fn test_doctor_workload_sample() {
        let table = sample().run_report("doctor-workload", &no_params()).unwrap();
        assert_eq!(table.len(), 6);

        let names: Vec<_> = table.column("DoctorName");
        assert_eq!(names[0], &Value::text("Dr. Rahul Mehta"));
        assert_eq!(names[5], &Value::text("Dr. Hannah Berg"));

        // Dr. Reyes has no department
        let reyes = table
            .records()
            .find(|r| r.get("DoctorID") == Some(&Value::Integer(6)))
            .unwrap();
        assert_eq!(reyes.get("Department"), Some(&Value::Null));
        assert_eq!(reyes.get("TotalRevenue"), Some(&Value::Decimal(170.0)));
    }

    #[test]
    fn test_patient_percentages_sum_to_100() {
        let table = sample().run_report("patient-status", &no_params()).unwrap();
        assert_eq!(table.len(), 3);

        let total: f64 = table.column("Percentage").into_iter().map(decimal).sum();
        assert!((total - 100.0).abs() <= 0.05, "{}", total);

        assert_eq!(table.cell(0, "Status"), Some(&Value::text("Stable")));
        assert_eq!(table.cell(0, "PatientCount"), Some(&Value::Integer(9)));
        assert_eq!(table.cell(0, "Percentage"), Some(&Value::Decimal(50.0)));
    }

    #[test]
    fn test_patient_status_outcomes() {
        let table = sample().run_report("patient-status", &no_params()).unwrap();
        let count = |column| -> i64 {
            table
                .column(column)
                .into_iter()
                .map(|v| v.as_i64().unwrap())
                .sum()
        };
        assert_eq!(count("PatientCount"), 18);
        assert_eq!(count("AppointmentCount"), 26);
        assert_eq!(count("CompletedAppointments"), 21);
        assert_eq!(count("CancelledAppointments"), 1);
        assert_eq!(count("NoShowAppointments"), 2);
    }

    #[test]
    fn test_patient_status_empty_store() {
        let table = ReportCatalog::new(Snapshot::default())
            .run_report("patient-status", &no_params())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 8);
    }

    #[test]
    fn test_collection_rate_bounds() {
        let table = sample()
            .run_report("department-financials", &no_params())
            .unwrap();
        // Radiology has no billed revenue
        assert_eq!(table.len(), 3);
        for record in table.records() {
            assert!(decimal(record.get("TotalRevenue").unwrap()) > 0.0);
            let rate = decimal(record.get("CollectionRate").unwrap());
            assert!((0.0..=100.0).contains(&rate), "{}", rate);
        }
    }

    #[test]
    fn test_zero_revenue_department_excluded() {
        let mut s = cardiology();
        s.departments.push(Department::new(2, "Free Clinic"));
        s.doctors.push(Doctor::new(2, "Dr. Z", "General").in_department(2.into()));
        s.appointments
            .push(Appointment::new(3, 1.into(), 2.into(), day(1, 7), AppointmentStatus::Completed));
        s.billing
            .push(Billing::new(3, 3.into(), Money::zero(), PaymentStatus::Paid));

        let table = ReportCatalog::new(s)
            .run_report("department-financials", &no_params())
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "DepartmentID"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_high_value_patients_capped_and_sorted() {
        let table = sample()
            .run_report("high-value-patients", &no_params())
            .unwrap();
        assert_eq!(table.len(), 15);

        let spent: Vec<f64> = table.column("TotalSpent").into_iter().map(decimal).collect();
        assert!(spent.iter().all(|s| *s > 0.0));
        assert!(spent.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(spent[0], 3550.0);
    }

    #[test]
    fn test_high_value_patient_detail() {
        let mut s = cardiology();
        s.appointments
            .push(Appointment::new(3, 1.into(), 1.into(), day(2, 1), AppointmentStatus::Cancelled));
        s.treatments = vec![
            Treatment::new(1, 1.into(), "ECG", Money::from_units(40)),
            Treatment::new(2, 1.into(), "Consultation", Money::from_units(60)),
        ];
        let table = ReportCatalog::new(s)
            .run_report("high-value-patients", &no_params())
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "PatientName"), Some(&Value::text("Patient Two")));
        let one = table.records().nth(1).unwrap();
        assert_eq!(one.get("AppointmentCount"), Some(&Value::Integer(2)));
        assert_eq!(one.get("TreatmentCount"), Some(&Value::Integer(2)));
        // Two treatments on the same appointment do not double the bill
        assert_eq!(one.get("TotalSpent"), Some(&Value::Decimal(100.0)));
        assert_eq!(one.get("AvgSpendPerAppointment"), Some(&Value::Decimal(100.0)));
        assert_eq!(one.get("FirstVisit"), Some(&Value::Date(day(1, 5))));
        assert_eq!(one.get("LastVisit"), Some(&Value::Date(day(2, 1))));
        assert_eq!(one.get("AssignedDoctor"), Some(&Value::text("Dr. A")));
    }

    #[test]
    fn test_equal_totals_order_by_lowest_id() {
        let mut s = cardiology();
        // Patient One's second visit brings both patients to $200
        s.appointments
            .push(Appointment::new(3, 1.into(), 1.into(), day(1, 9), AppointmentStatus::Completed));
        s.billing
            .push(Billing::new(3, 3.into(), Money::from_units(100), PaymentStatus::Paid));
        s.patients.reverse();

        let table = ReportCatalog::new(&s)
            .run_report("high-value-patients", &no_params())
            .unwrap();
        assert_eq!(table.column("TotalSpent"), vec![&Value::Decimal(200.0); 2]);
        assert_eq!(
            table.column("PatientID"),
            vec![&Value::Integer(1), &Value::Integer(2)]
        );

        // Two doctors billing the same total, listed highest id first
        let mut s = cardiology();
        s.doctors
            .insert(0, Doctor::new(2, "Dr. B", "Cardiologist").in_department(1.into()));
        s.appointments
            .push(Appointment::new(3, 1.into(), 2.into(), day(1, 9), AppointmentStatus::Completed));
        s.billing
            .push(Billing::new(3, 3.into(), Money::from_units(300), PaymentStatus::Pending));

        let table = ReportCatalog::new(s)
            .run_report("doctor-workload", &no_params())
            .unwrap();
        assert_eq!(table.column("TotalRevenue"), vec![&Value::Decimal(300.0); 2]);
        assert_eq!(
            table.column("DoctorID"),
            vec![&Value::Integer(1), &Value::Integer(2)]
        );
    }

    #[test]
    fn test_average_counts_each_bill_once() {
        let mut s = cardiology();
        // Patient One: a $100 visit with two treatments and a $200 visit with none
        s.appointments[1].patient_id = 1.into();
        s.treatments = vec![
            Treatment::new(1, 1.into(), "ECG", Money::from_units(40)),
            Treatment::new(2, 1.into(), "Consultation", Money::from_units(60)),
        ];

        let table = ReportCatalog::new(s)
            .run_report("high-value-patients", &no_params())
            .unwrap();
        assert_eq!(table.len(), 1);
        let row = table.records().next().unwrap();
        assert_eq!(row.get("PatientID"), Some(&Value::Integer(1)));
        assert_eq!(row.get("AppointmentCount"), Some(&Value::Integer(2)));
        assert_eq!(row.get("TreatmentCount"), Some(&Value::Integer(2)));
        assert_eq!(row.get("TotalSpent"), Some(&Value::Decimal(300.0)));
        assert_eq!(row.get("AvgSpendPerAppointment"), Some(&Value::Decimal(150.0)));
    }

    #[test]
    fn test_parameters_filter_rows() {
        let catalog = sample();

        let cardiology = catalog
            .run_report(
                "doctor_workload",
                &ReportParameters::new().with("department", "1"),
            )
            .unwrap();
        assert_eq!(cardiology.len(), 2);

        let critical = catalog
            .run_report(
                "high-value-patients",
                &ReportParameters::new().with("status", "Critical"),
            )
            .unwrap();
        assert!(critical
            .column("Status")
            .iter()
            .all(|s| **s == Value::text("Critical")));
    }

    #[test]
    fn test_date_range_keeps_outer_rows() {
        let params = ReportParameters::new()
            .with("from", "2024-03-01")
            .with("to", "2024-03-31");
        let table = sample().run_report("doctor-workload", &params).unwrap();

        // Every doctor is still listed
        assert_eq!(table.len(), 6);
        let appointments: i64 = table
            .column("AppointmentCount")
            .into_iter()
            .map(|v| v.as_i64().unwrap())
            .sum();
        assert_eq!(appointments, 6);
    }

    #[test]
    fn test_error_kinds() {
        let catalog = sample();

        let err = catalog.run_report("revenue-forecast", &no_params()).unwrap_err();
        assert_eq!(err.kind, ReportErrorKind::NotFound);

        let err = catalog
            .run_report("patient-status", &ReportParameters::new().with("ward", "2"))
            .unwrap_err();
        assert_eq!(err.kind, ReportErrorKind::InvalidParameter);

        let err = catalog
            .run_report("doctor-workload", &ReportParameters::new().with("doctor", "99"))
            .unwrap_err();
        assert_eq!(err.kind, ReportErrorKind::InvalidParameter);

        let err = catalog
            .run_report(
                "department-financials",
                &ReportParameters::new().with("from", "March"),
            )
            .unwrap_err();
        assert_eq!(err.kind, ReportErrorKind::InvalidParameter);
    }

    struct Unreachable;

    impl DataSource for Unreachable {
        fn scan(&self, _entity: EntityKind) -> ReportResult<Vec<Record>> {
            Err(ReportError::source_unavailable("connection refused"))
        }
    }

    #[test]
    fn test_source_failure_passes_through() {
        let catalog = ReportCatalog::new(Unreachable);
        for name in catalog.names() {
            let err = catalog.run_report(name, &no_params()).unwrap_err();
            assert_eq!(err.kind, ReportErrorKind::SourceUnavailable);
            assert_eq!(err.message, "connection refused");
        }

        // Lookup fails before the source is touched
        let err = catalog.run_report("nope", &no_params()).unwrap_err();
        assert!(err.is_not_found());
    }
}
