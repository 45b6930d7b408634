//! Treatment model

use serde::{Deserialize, Serialize};

use super::entity::{EntityKind, TableRow};
use super::ids::{AppointmentId, TreatmentId};
use super::money::Money;
use crate::query::Record;

/// A treatment administered during an appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: TreatmentId,
    pub appointment_id: AppointmentId,
    pub description: String,
    pub cost: Money,
}

impl Treatment {
    pub fn new(
        id: i64,
        appointment_id: AppointmentId,
        description: impl Into<String>,
        cost: Money,
    ) -> Self {
        Self {
            id: TreatmentId::new(id),
            appointment_id,
            description: description.into(),
            cost,
        }
    }
}

impl TableRow for Treatment {
    const KIND: EntityKind = EntityKind::Treatment;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id.get())
            .with("appointment_id", self.appointment_id.get())
            .with("description", self.description.as_str())
            .with("cost", self.cost)
    }
}
