//! Patient model
//!
//! Patients carry a clinical status and an optional assigned doctor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::entity::{EntityKind, TableRow};
use super::ids::{DoctorId, PatientId};
use crate::query::Record;

/// Clinical status of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatientStatus {
    Stable,
    Critical,
    Recovering,
}

impl PatientStatus {
    /// All statuses in declaration order
    pub const ALL: [PatientStatus; 3] = [Self::Stable, Self::Critical, Self::Recovering];
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => write!(f, "Stable"),
            Self::Critical => write!(f, "Critical"),
            Self::Recovering => write!(f, "Recovering"),
        }
    }
}

impl FromStr for PatientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "critical" => Ok(Self::Critical),
            "recovering" => Ok(Self::Recovering),
            _ => Err(format!(
                "unknown patient status '{}' (expected Stable, Critical or Recovering)",
                s
            )),
        }
    }
}

/// A patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub status: PatientStatus,
    /// Assigned (attending) doctor
    #[serde(default)]
    pub doctor_id: Option<DoctorId>,
}

impl Patient {
    /// Create a patient with no assigned doctor
    pub fn new(id: i64, name: impl Into<String>, status: PatientStatus) -> Self {
        Self {
            id: PatientId::new(id),
            name: name.into(),
            status,
            doctor_id: None,
        }
    }

    /// Assign an attending doctor
    pub fn assigned_to(mut self, doctor: DoctorId) -> Self {
        self.doctor_id = Some(doctor);
        self
    }
}

impl TableRow for Patient {
    const KIND: EntityKind = EntityKind::Patient;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id.get())
            .with("name", self.name.as_str())
            .with("status", self.status.to_string())
            .with("doctor_id", self.doctor_id.map(|d| d.get()))
    }
}
