//! Table metadata for the six hospital entities
//!
//! [`EntityKind`] names a table. Its column definitions drive both the DDL
//! renderer and the record conversion contract: every [`TableRow`] emits
//! exactly the columns declared here.

use std::fmt;
use std::str::FromStr;

use crate::query::Record;

/// SQL storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
    Date,
    Decimal,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Text => write!(f, "VARCHAR(100)"),
            Self::Date => write!(f, "DATE"),
            Self::Decimal => write!(f, "DECIMAL(10, 2)"),
        }
    }
}

/// Definition of one table column
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub primary_key: bool,
    /// Referenced table; the referenced column is always its `id`
    pub references: Option<EntityKind>,
    /// Allowed values for enumerated text columns
    pub allowed: &'static [&'static str],
}

const fn column(name: &'static str, sql_type: SqlType, nullable: bool) -> ColumnDef {
    ColumnDef {
        name,
        sql_type,
        nullable,
        primary_key: false,
        references: None,
        allowed: &[],
    }
}

const fn primary_key() -> ColumnDef {
    ColumnDef {
        primary_key: true,
        ..column("id", SqlType::Integer, false)
    }
}

const fn foreign_key(name: &'static str, target: EntityKind, nullable: bool) -> ColumnDef {
    ColumnDef {
        references: Some(target),
        ..column(name, SqlType::Integer, nullable)
    }
}

const fn enumerated(name: &'static str, allowed: &'static [&'static str]) -> ColumnDef {
    ColumnDef {
        allowed,
        ..column(name, SqlType::Text, false)
    }
}

const DEPARTMENT_COLUMNS: &[ColumnDef] = &[
    primary_key(),
    column("name", SqlType::Text, false),
    column("head", SqlType::Text, true),
];

const DOCTOR_COLUMNS: &[ColumnDef] = &[
    primary_key(),
    column("name", SqlType::Text, false),
    column("specialty", SqlType::Text, false),
    foreign_key("department_id", EntityKind::Department, true),
];

const PATIENT_COLUMNS: &[ColumnDef] = &[
    primary_key(),
    column("name", SqlType::Text, false),
    enumerated("status", &["Stable", "Critical", "Recovering"]),
    foreign_key("doctor_id", EntityKind::Doctor, true),
];

const APPOINTMENT_COLUMNS: &[ColumnDef] = &[
    primary_key(),
    foreign_key("patient_id", EntityKind::Patient, false),
    foreign_key("doctor_id", EntityKind::Doctor, false),
    column("date", SqlType::Date, false),
    enumerated("status", &["Scheduled", "Completed", "Cancelled", "No-Show"]),
];

const TREATMENT_COLUMNS: &[ColumnDef] = &[
    primary_key(),
    foreign_key("appointment_id", EntityKind::Appointment, false),
    column("description", SqlType::Text, false),
    column("cost", SqlType::Decimal, false),
];

const BILLING_COLUMNS: &[ColumnDef] = &[
    primary_key(),
    foreign_key("appointment_id", EntityKind::Appointment, false),
    column("total_amount", SqlType::Decimal, false),
    column("amount_paid", SqlType::Decimal, false),
    enumerated("payment_status", &["Paid", "Pending", "Overdue"]),
];

/// The tables of the hospital schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Department,
    Doctor,
    Patient,
    Appointment,
    Treatment,
    Billing,
}

impl EntityKind {
    /// All entities in dependency order (referenced tables first)
    pub const ALL: [EntityKind; 6] = [
        Self::Department,
        Self::Doctor,
        Self::Patient,
        Self::Appointment,
        Self::Treatment,
        Self::Billing,
    ];

    /// SQL table name
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Department => "Departments",
            Self::Doctor => "Doctors",
            Self::Patient => "Patients",
            Self::Appointment => "Appointments",
            Self::Treatment => "Treatments",
            Self::Billing => "Billing",
        }
    }

    /// Data file stem, e.g. `doctors` for `doctors.json`
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Department => "departments",
            Self::Doctor => "doctors",
            Self::Patient => "patients",
            Self::Appointment => "appointments",
            Self::Treatment => "treatments",
            Self::Billing => "billing",
        }
    }

    /// Column definitions, primary key first
    pub fn columns(&self) -> &'static [ColumnDef] {
        match self {
            Self::Department => DEPARTMENT_COLUMNS,
            Self::Doctor => DOCTOR_COLUMNS,
            Self::Patient => PATIENT_COLUMNS,
            Self::Appointment => APPOINTMENT_COLUMNS,
            Self::Treatment => TREATMENT_COLUMNS,
            Self::Billing => BILLING_COLUMNS,
        }
    }

    /// Look up a column definition by name
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns().iter().find(|c| c.name == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Department => write!(f, "department"),
            Self::Doctor => write!(f, "doctor"),
            Self::Patient => write!(f, "patient"),
            Self::Appointment => write!(f, "appointment"),
            Self::Treatment => write!(f, "treatment"),
            Self::Billing => write!(f, "billing"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.to_string() == lower || k.file_stem() == lower)
            .ok_or_else(|| format!("unknown entity '{}'", s))
    }
}

/// A typed row that can be handed to the query engine
pub trait TableRow {
    /// The table this row belongs to
    const KIND: EntityKind;

    /// Primary key value
    fn key(&self) -> i64;

    /// Convert into an engine record carrying every declared column
    fn to_record(&self) -> Record;
}
