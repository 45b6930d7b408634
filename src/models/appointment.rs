//! Appointment model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{EntityKind, TableRow};
use super::ids::{AppointmentId, DoctorId, PatientId};
use crate::query::Record;

/// Outcome of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No-Show", alias = "NoShow")]
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        Self::Scheduled,
        Self::Completed,
        Self::Cancelled,
        Self::NoShow,
    ];
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "Scheduled"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::NoShow => write!(f, "No-Show"),
        }
    }
}

/// An appointment between a patient and a doctor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn new(
        id: i64,
        patient_id: PatientId,
        doctor_id: DoctorId,
        date: NaiveDate,
        status: AppointmentStatus,
    ) -> Self {
        Self {
            id: AppointmentId::new(id),
            patient_id,
            doctor_id,
            date,
            status,
        }
    }
}

impl TableRow for Appointment {
    const KIND: EntityKind = EntityKind::Appointment;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id.get())
            .with("patient_id", self.patient_id.get())
            .with("doctor_id", self.doctor_id.get())
            .with("date", self.date)
            .with("status", self.status.to_string())
    }
}
