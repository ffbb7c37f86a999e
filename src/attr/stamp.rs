use std::fmt;

use chrono::{NaiveDateTime, Timelike, Utc};

use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

/// Canonical storage form for timestamps.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A point in time at second precision, ordered strictly.
///
/// Sub-second precision is dropped on construction so an instance always
/// round-trips unchanged through its storage representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    value: NaiveDateTime,
}

impl Timestamp {
    pub fn new(raw: &str) -> Result<Self> {
        let value = NaiveDateTime::parse_from_str(raw.trim(), STORAGE_FORMAT).map_err(|_| {
            StoreError::Validation(format!("'{}' is not a valid timestamp", raw))
        })?;
        Ok(Self { value })
    }

    /// Non-throwing factory.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::new(raw).ok()
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now().naive_utc())
    }

    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self {
            value: value.with_nanosecond(0).unwrap_or(value),
        }
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.value
    }

    /// Strict ordering: equal instants are not "after" each other.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.value > other.value
    }
}

impl Attribute for Timestamp {
    fn representation(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.format(STORAGE_FORMAT))
    }
}
