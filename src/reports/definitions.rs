//! The four canonical reports
//!
//! Each report is a `const` descriptor: a query plan plus the parameters it
//! accepts. Joins toward the "many" side are left outer joins so that a
//! parent with no children still produces a row.

use crate::models::EntityKind;
use crate::query::{
    col, ColumnType, CompareOp, Condition, Direction, GroupKey, Having, Join, JoinKind, Literal,
    Measure, MeasureDef, QueryPlan, SortKey, Source,
};

use super::parameters::{Bound, ParameterKind, ParameterSpec};

/// A named, parameterizable report
#[derive(Debug, Clone, Copy)]
pub struct ReportDefinition {
    /// Catalog name, kebab-case
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub plan: QueryPlan,
    pub parameters: &'static [ParameterSpec],
    /// Decimal outputs holding amounts of money, for display
    pub money_columns: &'static [&'static str],
}

impl ReportDefinition {
    /// Look up an accepted parameter by name
    pub fn parameter(&self, name: &str) -> Option<&'static ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

const fn left_join(
    entity: EntityKind,
    alias: &'static str,
    left: (&'static str, &'static str),
    right: &'static str,
) -> Join {
    Join {
        entity,
        alias,
        kind: JoinKind::LeftOuter,
        left: col(left.0, left.1),
        right: col(alias, right),
    }
}

const fn key(
    alias: &'static str,
    column: &'static str,
    output: &'static str,
    kind: ColumnType,
) -> GroupKey {
    GroupKey {
        column: col(alias, column),
        output,
        kind,
    }
}

const fn measure(output: &'static str, kind: ColumnType, measure: Measure) -> MeasureDef {
    MeasureDef {
        output,
        kind,
        measure,
    }
}

const fn count_distinct(alias: &'static str, column: &'static str) -> Measure {
    Measure::CountDistinct {
        of: col(alias, column),
        filter: None,
    }
}

const fn count_where(
    alias: &'static str,
    column: &'static str,
    field: &'static str,
    equals: &'static str,
) -> Measure {
    Measure::CountDistinct {
        of: col(alias, column),
        filter: Some(Condition::Equals(col(alias, field), Literal::Text(equals))),
    }
}

const fn descending(column: &'static str) -> SortKey {
    SortKey {
        column,
        direction: Direction::Descending,
    }
}

const fn positive(column: &'static str) -> Option<Having> {
    Some(Having {
        column,
        op: CompareOp::GreaterThan,
        value: 0.0,
    })
}

const fn id_param(
    name: &'static str,
    description: &'static str,
    entity: EntityKind,
    alias: &'static str,
    column: &'static str,
) -> ParameterSpec {
    ParameterSpec {
        name,
        description,
        kind: ParameterKind::EntityId(entity),
        target: col(alias, column),
        bound: Bound::Equals,
    }
}

/// `from` and `to` restrict the appointments joined under `alias`
const fn date_range(alias: &'static str) -> [ParameterSpec; 2] {
    [
        ParameterSpec {
            name: "from",
            description: "Only count appointments on or after this date",
            kind: ParameterKind::Date,
            target: col(alias, "date"),
            bound: Bound::OnOrAfter,
        },
        ParameterSpec {
            name: "to",
            description: "Only count appointments on or before this date",
            kind: ParameterKind::Date,
            target: col(alias, "date"),
            bound: Bound::OnOrBefore,
        },
    ]
}

const APPOINTMENT_RANGE: [ParameterSpec; 2] = date_range("a");

const BY_TOTAL_REVENUE: &[SortKey] = &[descending("TotalRevenue")];

// Doctor workload

const DOCTOR_WORKLOAD_JOINS: &[Join] = &[
    left_join(EntityKind::Department, "dep", ("d", "department_id"), "id"),
    left_join(EntityKind::Patient, "p", ("d", "id"), "doctor_id"),
    left_join(EntityKind::Appointment, "a", ("d", "id"), "doctor_id"),
    left_join(EntityKind::Billing, "b", ("a", "id"), "appointment_id"),
];

const DOCTOR_WORKLOAD_GROUP: &[GroupKey] = &[
    key("d", "id", "DoctorID", ColumnType::Integer),
    key("d", "name", "DoctorName", ColumnType::Text),
    key("d", "specialty", "Specialty", ColumnType::Text),
    key("dep", "name", "Department", ColumnType::Text),
];

const DOCTOR_WORKLOAD_MEASURES: &[MeasureDef] = &[
    measure("PatientCount", ColumnType::Integer, count_distinct("p", "id")),
    measure("AppointmentCount", ColumnType::Integer, count_distinct("a", "id")),
    measure(
        "AvgBilled",
        ColumnType::Decimal,
        Measure::Avg {
            of: col("b", "total_amount"),
        },
    ),
    measure(
        "TotalRevenue",
        ColumnType::Decimal,
        Measure::Sum {
            of: col("b", "total_amount"),
            filter: None,
        },
    ),
];

const DOCTOR_WORKLOAD_PARAMS: &[ParameterSpec] = &[
    id_param(
        "department",
        "Only doctors in this department",
        EntityKind::Department,
        "d",
        "department_id",
    ),
    id_param("doctor", "Only this doctor", EntityKind::Doctor, "d", "id"),
    APPOINTMENT_RANGE[0],
    APPOINTMENT_RANGE[1],
];

pub const DOCTOR_WORKLOAD: ReportDefinition = ReportDefinition {
    name: "doctor-workload",
    title: "Doctor Workload",
    description: "Patients, appointments and billed revenue per doctor",
    plan: QueryPlan {
        from: Source {
            entity: EntityKind::Doctor,
            alias: "d",
        },
        joins: DOCTOR_WORKLOAD_JOINS,
        group_by: DOCTOR_WORKLOAD_GROUP,
        measures: DOCTOR_WORKLOAD_MEASURES,
        having: None,
        order_by: BY_TOTAL_REVENUE,
        tie_break: "DoctorID",
        limit: None,
    },
    parameters: DOCTOR_WORKLOAD_PARAMS,
    money_columns: &["AvgBilled", "TotalRevenue"],
};

// Patient status distribution

const PATIENT_STATUS_JOINS: &[Join] = &[left_join(
    EntityKind::Appointment,
    "a",
    ("p", "id"),
    "patient_id",
)];

const PATIENT_STATUS_GROUP: &[GroupKey] = &[key("p", "status", "Status", ColumnType::Text)];

const PATIENT_STATUS_MEASURES: &[MeasureDef] = &[
    measure("PatientCount", ColumnType::Integer, count_distinct("p", "id")),
    measure(
        "Percentage",
        ColumnType::Decimal,
        Measure::ShareOfTotal { of: "PatientCount" },
    ),
    measure("AppointmentCount", ColumnType::Integer, count_distinct("a", "id")),
    measure(
        "AvgAppointmentsPerPatient",
        ColumnType::Decimal,
        Measure::Ratio {
            numerator: "AppointmentCount",
            denominator: "PatientCount",
            scale: 1.0,
        },
    ),
    measure(
        "CompletedAppointments",
        ColumnType::Integer,
        count_where("a", "id", "status", "Completed"),
    ),
    measure(
        "CancelledAppointments",
        ColumnType::Integer,
        count_where("a", "id", "status", "Cancelled"),
    ),
    measure(
        "NoShowAppointments",
        ColumnType::Integer,
        count_where("a", "id", "status", "No-Show"),
    ),
];

const PATIENT_STATUS_PARAMS: &[ParameterSpec] = &[
    id_param(
        "doctor",
        "Only patients assigned to this doctor",
        EntityKind::Doctor,
        "p",
        "doctor_id",
    ),
    APPOINTMENT_RANGE[0],
    APPOINTMENT_RANGE[1],
];

pub const PATIENT_STATUS: ReportDefinition = ReportDefinition {
    name: "patient-status",
    title: "Patient Status Distribution",
    description: "Patients per status with their share of the total and appointment outcomes",
    plan: QueryPlan {
        from: Source {
            entity: EntityKind::Patient,
            alias: "p",
        },
        joins: PATIENT_STATUS_JOINS,
        group_by: PATIENT_STATUS_GROUP,
        measures: PATIENT_STATUS_MEASURES,
        having: None,
        order_by: &[SortKey {
            column: "PatientCount",
            direction: Direction::Descending,
        }],
        tie_break: "Status",
        limit: None,
    },
    parameters: PATIENT_STATUS_PARAMS,
    money_columns: &[],
};

// Department financial performance

const DEPARTMENT_FINANCIALS_JOINS: &[Join] = &[
    left_join(EntityKind::Doctor, "d", ("dep", "id"), "department_id"),
    left_join(EntityKind::Appointment, "a", ("d", "id"), "doctor_id"),
    left_join(EntityKind::Billing, "b", ("a", "id"), "appointment_id"),
];

const DEPARTMENT_FINANCIALS_GROUP: &[GroupKey] = &[
    key("dep", "id", "DepartmentID", ColumnType::Integer),
    key("dep", "name", "DepartmentName", ColumnType::Text),
];

const DEPARTMENT_FINANCIALS_MEASURES: &[MeasureDef] = &[
    measure("DoctorCount", ColumnType::Integer, count_distinct("d", "id")),
    measure("AppointmentCount", ColumnType::Integer, count_distinct("a", "id")),
    measure(
        "TotalRevenue",
        ColumnType::Decimal,
        Measure::Sum {
            of: col("b", "total_amount"),
            filter: None,
        },
    ),
    measure(
        "AvgRevenuePerAppointment",
        ColumnType::Decimal,
        Measure::Avg {
            of: col("b", "total_amount"),
        },
    ),
    measure(
        "CollectedRevenue",
        ColumnType::Decimal,
        Measure::Sum {
            of: col("b", "total_amount"),
            filter: Some(Condition::Equals(
                col("b", "payment_status"),
                Literal::Text("Paid"),
            )),
        },
    ),
    measure(
        "CollectionRate",
        ColumnType::Decimal,
        Measure::Ratio {
            numerator: "CollectedRevenue",
            denominator: "TotalRevenue",
            scale: 100.0,
        },
    ),
];

const DEPARTMENT_FINANCIALS_PARAMS: &[ParameterSpec] = &[
    id_param(
        "department",
        "Only this department",
        EntityKind::Department,
        "dep",
        "id",
    ),
    APPOINTMENT_RANGE[0],
    APPOINTMENT_RANGE[1],
];

pub const DEPARTMENT_FINANCIALS: ReportDefinition = ReportDefinition {
    name: "department-financials",
    title: "Department Financial Performance",
    description: "Revenue, collections and collection rate per department with billed revenue",
    plan: QueryPlan {
        from: Source {
            entity: EntityKind::Department,
            alias: "dep",
        },
        joins: DEPARTMENT_FINANCIALS_JOINS,
        group_by: DEPARTMENT_FINANCIALS_GROUP,
        measures: DEPARTMENT_FINANCIALS_MEASURES,
        having: positive("TotalRevenue"),
        order_by: BY_TOTAL_REVENUE,
        tie_break: "DepartmentID",
        limit: None,
    },
    parameters: DEPARTMENT_FINANCIALS_PARAMS,
    money_columns: &["TotalRevenue", "AvgRevenuePerAppointment", "CollectedRevenue"],
};

// High-value patients

/// Row cap of the high-value patient report
pub const HIGH_VALUE_LIMIT: usize = 15;

const HIGH_VALUE_JOINS: &[Join] = &[
    left_join(EntityKind::Doctor, "d", ("p", "doctor_id"), "id"),
    left_join(EntityKind::Appointment, "a", ("p", "id"), "patient_id"),
    left_join(EntityKind::Treatment, "t", ("a", "id"), "appointment_id"),
    left_join(EntityKind::Billing, "b", ("a", "id"), "appointment_id"),
];

const HIGH_VALUE_GROUP: &[GroupKey] = &[
    key("p", "id", "PatientID", ColumnType::Integer),
    key("p", "name", "PatientName", ColumnType::Text),
    key("p", "status", "Status", ColumnType::Text),
    key("d", "name", "AssignedDoctor", ColumnType::Text),
];

const HIGH_VALUE_MEASURES: &[MeasureDef] = &[
    measure("AppointmentCount", ColumnType::Integer, count_distinct("a", "id")),
    measure("TreatmentCount", ColumnType::Integer, count_distinct("t", "id")),
    measure(
        "TotalSpent",
        ColumnType::Decimal,
        Measure::Sum {
            of: col("b", "total_amount"),
            filter: None,
        },
    ),
    measure(
        "AvgSpendPerAppointment",
        ColumnType::Decimal,
        Measure::Avg {
            of: col("b", "total_amount"),
        },
    ),
    measure(
        "FirstVisit",
        ColumnType::Date,
        Measure::Min {
            of: col("a", "date"),
        },
    ),
    measure(
        "LastVisit",
        ColumnType::Date,
        Measure::Max {
            of: col("a", "date"),
        },
    ),
];

const HIGH_VALUE_PARAMS: &[ParameterSpec] = &[
    id_param(
        "doctor",
        "Only patients assigned to this doctor",
        EntityKind::Doctor,
        "p",
        "doctor_id",
    ),
    ParameterSpec {
        name: "status",
        description: "Only patients with this status",
        kind: ParameterKind::PatientStatus,
        target: col("p", "status"),
        bound: Bound::Equals,
    },
    APPOINTMENT_RANGE[0],
    APPOINTMENT_RANGE[1],
];

pub const HIGH_VALUE_PATIENTS: ReportDefinition = ReportDefinition {
    name: "high-value-patients",
    title: "High-Value Patients",
    description: "Top patients by total billed spend",
    plan: QueryPlan {
        from: Source {
            entity: EntityKind::Patient,
            alias: "p",
        },
        joins: HIGH_VALUE_JOINS,
        group_by: HIGH_VALUE_GROUP,
        measures: HIGH_VALUE_MEASURES,
        having: positive("TotalSpent"),
        order_by: &[SortKey {
            column: "TotalSpent",
            direction: Direction::Descending,
        }],
        tie_break: "PatientID",
        limit: Some(HIGH_VALUE_LIMIT),
    },
    parameters: HIGH_VALUE_PARAMS,
    money_columns: &["TotalSpent", "AvgSpendPerAppointment"],
};

/// Every report, in catalog order
pub const REPORTS: &[ReportDefinition] = &[
    DOCTOR_WORKLOAD,
    PATIENT_STATUS,
    DEPARTMENT_FINANCIALS,
    HIGH_VALUE_PATIENTS,
];

/// Canonical form of a report name: lowercase, `_` read as `-`
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace('_', "-")
}

/// Find a report by name
pub fn find(name: &str) -> Option<&'static ReportDefinition> {
    let wanted = normalize_name(name);
    REPORTS.iter().find(|r| r.name == wanted)
}
