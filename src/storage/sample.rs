//! Demonstration dataset written by `hospital init --sample`
//!
//! Four departments (one with no activity), six doctors (one without a
//! department, one without appointments), eighteen patients and a quarter's
//! worth of appointments, treatments and bills.

use chrono::NaiveDate;

use super::snapshot::Snapshot;
use crate::error::{HospitalError, HospitalResult};
use crate::models::{
    Appointment, AppointmentStatus, Billing, Department, Doctor, Money, Patient, PatientStatus,
    PaymentStatus, Treatment,
};

use AppointmentStatus::{Cancelled, Completed, NoShow, Scheduled};
use PatientStatus::{Critical, Recovering, Stable};
use PaymentStatus::{Overdue, Paid, Pending};

const SAMPLE_YEAR: i32 = 2024;

const DEPARTMENTS: &[(i64, &str, Option<&str>)] = &[
    (1, "Cardiology", Some("Dr. Alice Moreno")),
    (2, "Neurology", Some("Dr. Rahul Mehta")),
    (3, "Pediatrics", Some("Dr. Grace Liu")),
    (4, "Radiology", None),
];

const DOCTORS: &[(i64, &str, &str, Option<i64>)] = &[
    (1, "Dr. Alice Moreno", "Cardiologist", Some(1)),
    (2, "Dr. Samuel Ortiz", "Cardiologist", Some(1)),
    (3, "Dr. Rahul Mehta", "Neurologist", Some(2)),
    (4, "Dr. Grace Liu", "Pediatrician", Some(3)),
    (5, "Dr. Hannah Berg", "Radiologist", Some(4)),
    (6, "Dr. Tomas Reyes", "General Practitioner", None),
];

const PATIENTS: &[(i64, &str, PatientStatus, Option<i64>)] = &[
    (1, "John Carter", Stable, Some(1)),
    (2, "Maria Lopez", Critical, Some(1)),
    (3, "Wei Zhang", Recovering, Some(2)),
    (4, "Fatima Khan", Stable, Some(2)),
    (5, "Peter Novak", Critical, Some(3)),
    (6, "Aisha Bello", Recovering, Some(3)),
    (7, "Liam O'Brien", Stable, Some(4)),
    (8, "Sofia Rossi", Stable, Some(4)),
    (9, "Noah Fischer", Recovering, Some(6)),
    (10, "Emma Dubois", Critical, Some(1)),
    (11, "Lucas Silva", Stable, Some(3)),
    (12, "Olivia Brown", Recovering, Some(4)),
    (13, "Mateo Garcia", Stable, Some(2)),
    (14, "Chloe Martin", Critical, None),
    (15, "Ethan Wright", Stable, Some(6)),
    (16, "Yuki Tanaka", Recovering, Some(1)),
    (17, "Amara Okafor", Stable, Some(3)),
    (18, "Daniel Kim", Stable, None),
];

/// (id, patient, doctor, (month, day), status)
const APPOINTMENTS: &[(i64, i64, i64, (u32, u32), AppointmentStatus)] = &[
    (1, 1, 1, (1, 8), Completed),
    (2, 2, 1, (1, 9), Completed),
    (3, 3, 2, (1, 10), Completed),
    (4, 4, 2, (1, 12), Cancelled),
    (5, 5, 3, (1, 15), Completed),
    (6, 6, 3, (1, 16), NoShow),
    (7, 7, 4, (1, 18), Completed),
    (8, 8, 4, (1, 22), Completed),
    (9, 9, 6, (1, 25), Completed),
    (10, 10, 1, (2, 1), Completed),
    (11, 11, 3, (2, 3), Completed),
    (12, 12, 4, (2, 5), Completed),
    (13, 13, 2, (2, 7), Completed),
    (14, 14, 3, (2, 9), Completed),
    (15, 15, 6, (2, 12), Completed),
    (16, 16, 1, (2, 14), Completed),
    (17, 17, 3, (2, 19), Completed),
    (18, 2, 1, (2, 20), Completed),
    (19, 5, 3, (2, 22), Completed),
    (20, 1, 2, (2, 26), Completed),
    (21, 10, 1, (3, 4), Scheduled),
    (22, 7, 4, (3, 6), Completed),
    (23, 6, 3, (3, 8), Completed),
    (24, 14, 1, (3, 11), Scheduled),
    (25, 4, 2, (3, 13), Completed),
    (26, 12, 4, (3, 15), NoShow),
];

/// (id, appointment, description, cost in cents)
const TREATMENTS: &[(i64, i64, &str, i64)] = &[
    (1, 1, "ECG", 15_000),
    (2, 1, "Consultation", 30_000),
    (3, 2, "Echocardiogram", 70_000),
    (4, 2, "Cardiac monitoring", 50_000),
    (5, 3, "Stress test", 38_000),
    (6, 5, "MRI brain", 150_000),
    (7, 5, "Neurology consult", 60_000),
    (8, 7, "Vaccination", 15_000),
    (9, 8, "Checkup", 12_000),
    (10, 9, "Blood panel", 8_000),
    (11, 10, "Angiography", 95_000),
    (12, 11, "EEG", 64_000),
    (13, 12, "Checkup", 11_000),
    (14, 14, "CT scan", 180_000),
    (15, 16, "Holter monitor", 52_000),
    (16, 17, "Nerve conduction study", 33_000),
    (17, 18, "Follow-up ECG", 88_000),
    (18, 19, "MRI follow-up", 145_000),
    (19, 22, "Follow-up visit", 16_000),
    (20, 23, "Physiotherapy", 72_000),
];

/// (id, appointment, total in cents, status)
const BILLS: &[(i64, i64, i64, PaymentStatus)] = &[
    (1, 1, 45_000, Paid),
    (2, 2, 120_000, Pending),
    (3, 3, 38_000, Paid),
    (4, 5, 210_000, Overdue),
    (5, 7, 15_000, Paid),
    (6, 8, 12_000, Paid),
    (7, 9, 8_000, Pending),
    (8, 10, 95_000, Paid),
    (9, 11, 64_000, Paid),
    (10, 12, 11_000, Pending),
    (11, 13, 27_500, Paid),
    (12, 14, 180_000, Pending),
    (13, 15, 9_000, Paid),
    (14, 16, 52_000, Overdue),
    (15, 17, 33_000, Paid),
    (16, 18, 88_000, Paid),
    (17, 19, 145_000, Paid),
    (18, 20, 30_000, Pending),
    (19, 22, 16_000, Paid),
    (20, 23, 72_000, Paid),
    (21, 25, 41_000, Paid),
];

fn sample_date((month, day): (u32, u32)) -> HospitalResult<NaiveDate> {
    NaiveDate::from_ymd_opt(SAMPLE_YEAR, month, day).ok_or_else(|| {
        HospitalError::Validation(format!("invalid sample date {}-{}", month, day))
    })
}

/// Build the demonstration dataset
pub fn sample_snapshot() -> HospitalResult<Snapshot> {
    let departments = DEPARTMENTS
        .iter()
        .map(|&(id, name, head)| match head {
            Some(head) => Department::new(id, name).with_head(head),
            None => Department::new(id, name),
        })
        .collect();

    let doctors = DOCTORS
        .iter()
        .map(|&(id, name, specialty, department)| {
            let doctor = Doctor::new(id, name, specialty);
            match department {
                Some(dep) => doctor.in_department(dep.into()),
                None => doctor,
            }
        })
        .collect();

    let patients = PATIENTS
        .iter()
        .map(|&(id, name, status, doctor)| {
            let patient = Patient::new(id, name, status);
            match doctor {
                Some(doc) => patient.assigned_to(doc.into()),
                None => patient,
            }
        })
        .collect();

    let appointments = APPOINTMENTS
        .iter()
        .map(|&(id, patient, doctor, date, status)| {
            Ok(Appointment::new(
                id,
                patient.into(),
                doctor.into(),
                sample_date(date)?,
                status,
            ))
        })
        .collect::<HospitalResult<Vec<_>>>()?;

    let treatments = TREATMENTS
        .iter()
        .map(|&(id, appointment, description, cents)| {
            Treatment::new(id, appointment.into(), description, Money::from_cents(cents))
        })
        .collect();

    let billing = BILLS
        .iter()
        .map(|&(id, appointment, cents, status)| {
            let bill = Billing::new(id, appointment.into(), Money::from_cents(cents), status);
            // Overdue bills carry a partial payment
            match status {
                Overdue => bill.with_amount_paid(Money::from_cents(cents / 4)),
                _ => bill,
            }
        })
        .collect();

    Ok(Snapshot {
        departments,
        doctors,
        patients,
        appointments,
        treatments,
        billing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;

    #[test]
    fn test_sample_sizes() {
        let snapshot = sample_snapshot().unwrap();
        assert_eq!(snapshot.row_count(EntityKind::Department), 4);
        assert_eq!(snapshot.row_count(EntityKind::Doctor), 6);
        assert_eq!(snapshot.row_count(EntityKind::Patient), 18);
        assert_eq!(snapshot.row_count(EntityKind::Appointment), 26);
        assert_eq!(snapshot.row_count(EntityKind::Billing), 21);
    }

    #[test]
    fn test_paid_bills_fully_paid() {
        let snapshot = sample_snapshot().unwrap();
        for bill in &snapshot.billing {
            match bill.payment_status {
                PaymentStatus::Paid => assert!(bill.outstanding().is_zero()),
                _ => assert!(!bill.outstanding().is_zero()),
            }
        }
    }
}
