//! Doctor model

use serde::{Deserialize, Serialize};

use super::entity::{EntityKind, TableRow};
use super::ids::{DepartmentId, DoctorId};
use crate::query::Record;

/// A doctor, optionally attached to a department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
}

impl Doctor {
    /// Create a doctor with no department
    pub fn new(id: i64, name: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            id: DoctorId::new(id),
            name: name.into(),
            specialty: specialty.into(),
            department_id: None,
        }
    }

    /// Attach the doctor to a department
    pub fn in_department(mut self, department: DepartmentId) -> Self {
        self.department_id = Some(department);
        self
    }
}

impl TableRow for Doctor {
    const KIND: EntityKind = EntityKind::Doctor;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id.get())
            .with("name", self.name.as_str())
            .with("specialty", self.specialty.as_str())
            .with("department_id", self.department_id.map(|d| d.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Value;

    #[test]
    fn test_to_record() {
        let doctor = Doctor::new(3, "Dr. Osei", "Neurology").in_department(DepartmentId::new(2));
        let record = doctor.to_record();
        assert_eq!(record.get("id"), &Value::Integer(3));
        assert_eq!(record.get("department_id"), &Value::Integer(2));
        assert_eq!(record.columns().count(), EntityKind::Doctor.columns().len());
    }

    #[test]
    fn test_unassigned_department_is_null() {
        let record = Doctor::new(9, "Dr. Vale", "General Practice").to_record();
        assert!(record.get("department_id").is_null());
    }
}
