//! A single scanned row, keyed by column name

use std::collections::BTreeMap;

use super::value::Value;

static NULL: Value = Value::Null;

/// One row of an entity table as seen by the query engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: BTreeMap<&'static str, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.values.insert(column, value.into());
        self
    }

    /// Set a column value
    pub fn set(&mut self, column: &'static str, value: impl Into<Value>) {
        self.values.insert(column, value.into());
    }

    /// Get a column value; unknown columns read as null
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }

    /// Column names present in this record
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_is_null() {
        let record = Record::new().with("id", 1);
        assert_eq!(record.get("id"), &Value::Integer(1));
        assert!(record.get("name").is_null());
    }

    #[test]
    fn test_set_overwrites() {
        let mut record = Record::new().with("status", "Stable");
        record.set("status", "Critical");
        assert_eq!(record.get("status").as_str(), Some("Critical"));
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["status"]);
    }
}
