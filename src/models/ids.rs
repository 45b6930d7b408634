//! Strongly-typed ID wrappers for all entity types
//!
//! Every table uses an integer surrogate key. Wrapping each in its own newtype
//! keeps a doctor id from being passed where an appointment id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw key
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the underlying key
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

define_id!(DepartmentId);
define_id!(DoctorId);
define_id!(PatientId);
define_id!(AppointmentId);
define_id!(TreatmentId);
define_id!(BillingId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(DoctorId::new(7).to_string(), "7");
    }

    #[test]
    fn test_id_parse() {
        assert_eq!(" 12 ".parse::<PatientId>().unwrap(), PatientId::new(12));
        assert!("twelve".parse::<PatientId>().is_err());
    }

    #[test]
    fn test_id_ordering() {
        assert!(DepartmentId::new(1) < DepartmentId::new(2));
    }

    #[test]
    fn test_id_serialization() {
        let json = serde_json::to_string(&BillingId::new(301)).unwrap();
        assert_eq!(json, "301");
        let back: BillingId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(), 301);
    }
}
