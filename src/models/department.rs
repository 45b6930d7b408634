//! Department model

use serde::{Deserialize, Serialize};

use super::entity::{EntityKind, TableRow};
use super::ids::DepartmentId;
use crate::query::Record;

/// A hospital department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    /// Name of the head of department, if one is appointed
    #[serde(default)]
    pub head: Option<String>,
}

impl Department {
    /// Create a department without a head
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: DepartmentId::new(id),
            name: name.into(),
            head: None,
        }
    }

    /// Set the head of department
    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }
}

impl TableRow for Department {
    const KIND: EntityKind = EntityKind::Department;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id.get())
            .with("name", self.name.as_str())
            .with("head", self.head.as_deref())
    }
}
