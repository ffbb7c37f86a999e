use std::fmt;

use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

/// A positive integer row identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PrimaryKey {
    value: i64,
}

impl PrimaryKey {
    pub fn new(value: i64) -> Result<Self> {
        if value < 1 {
            return Err(StoreError::Validation(format!(
                "{} is not a valid primary key",
                value
            )));
        }
        Ok(Self { value })
    }

    /// Builds a key from a raw storage value, coercing numeric text.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Self::new(*i),
            Value::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| {
                    StoreError::TypeMismatch(format!("'{}' is not a numeric key", s))
                })
                .and_then(Self::new),
            other => Err(StoreError::TypeMismatch(format!(
                "{} cannot be a primary key",
                other.type_name()
            ))),
        }
    }

    /// Non-throwing factory.
    pub fn parse(value: i64) -> Option<Self> {
        Self::new(value).ok()
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Attribute for PrimaryKey {
    fn representation(&self) -> Value {
        Value::Integer(self.value)
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
