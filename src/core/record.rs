use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::{Result, StoreError, Value};

/// A flat column-to-value map, the only currency exchanged with the DAO
/// layer. Column order is deterministic so generated SQL is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.fields.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn columns(&self) -> Vec<&str> {
        self.fields.keys().map(|k| k.as_str()).collect()
    }

    /// Returns a copy holding only the listed columns; everything else is
    /// silently dropped.
    pub fn retain_columns(&self, columns: &BTreeSet<String>) -> Record {
        Record {
            fields: self
                .fields
                .iter()
                .filter(|(column, _)| columns.contains(*column))
                .map(|(column, value)| (column.clone(), value.clone()))
                .collect(),
        }
    }

    pub fn require(&self, column: &str) -> Result<&Value> {
        self.fields.get(column).ok_or_else(|| {
            StoreError::Config(format!("record is missing required field '{}'", column))
        })
    }

    /// Native-cast coercion to an integer.
    pub fn require_int(&self, column: &str) -> Result<i64> {
        match self.require(column)? {
            Value::Integer(i) => Ok(*i),
            Value::Boolean(b) => Ok(i64::from(*b)),
            Value::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                StoreError::TypeMismatch(format!("field '{}' is not numeric: '{}'", column, s))
            }),
            Value::Null => Err(StoreError::TypeMismatch(format!(
                "field '{}' is NULL, expected an integer",
                column
            ))),
        }
    }

    /// Native-cast coercion to text.
    pub fn require_text(&self, column: &str) -> Result<String> {
        match self.require(column)? {
            Value::Null => Err(StoreError::TypeMismatch(format!(
                "field '{}' is NULL, expected text",
                column
            ))),
            value => Ok(value.to_string()),
        }
    }

    /// Native-cast coercion to a boolean.
    pub fn require_bool(&self, column: &str) -> Result<bool> {
        match self.require(column)? {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(i) => Ok(*i != 0),
            Value::Text(s) => match s.to_ascii_lowercase().as_str() {
                "1" | "true" | "t" => Ok(true),
                "0" | "false" | "f" | "" => Ok(false),
                _ => Err(StoreError::TypeMismatch(format!(
                    "field '{}' is not boolean: '{}'",
                    column, s
                ))),
            },
            Value::Null => Err(StoreError::TypeMismatch(format!(
                "field '{}' is NULL, expected a boolean",
                column
            ))),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (column, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", column, value)?;
        }
        write!(f, "}}")
    }
}

/// Builds a [`Record`] from `column => value` pairs.
#[macro_export]
macro_rules! record {
    () => {
        $crate::core::Record::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::core::Record::new();
        $( record.set($column, $crate::core::Value::from($value)); )+
        record
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_macro_and_access() {
        let record = record! {
            "user_id" => 7i64,
            "email" => "a@b.cd",
            "active" => true,
        };

        assert_eq!(record.len(), 3);
        assert_eq!(record.require_int("user_id").unwrap(), 7);
        assert_eq!(record.require_text("email").unwrap(), "a@b.cd");
        assert!(record.require_bool("active").unwrap());
        assert!(record.require("missing").is_err());
    }

    #[test]
    fn test_native_coercion() {
        let record = record! {
            "count" => "42",
            "flag" => 1i64,
            "label" => 9i64,
        };

        assert_eq!(record.require_int("count").unwrap(), 42);
        assert!(record.require_bool("flag").unwrap());
        assert_eq!(record.require_text("label").unwrap(), "9");
        assert!(record.require_int("label").is_ok());
    }

    #[test]
    fn test_retain_columns_drops_unknown() {
        let record = record! {
            "known" => 1i64,
            "unknown" => 2i64,
        };
        let allowed: BTreeSet<String> = ["known".to_string()].into_iter().collect();

        let filtered = record.retain_columns(&allowed);
        assert!(filtered.contains("known"));
        assert!(!filtered.contains("unknown"));
    }
}
