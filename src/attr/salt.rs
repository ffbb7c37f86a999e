use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

lazy_static! {
    static ref SALT_PATTERN: Regex = Regex::new(r"^[a-z0-9]{8,32}$").unwrap();
}

/// A per-user salt string: 8 to 32 lowercase alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt {
    value: String,
}

impl Salt {
    pub fn new(raw: &str) -> Result<Self> {
        if !SALT_PATTERN.is_match(raw) {
            return Err(StoreError::Validation(format!(
                "'{}' is not a valid salt",
                raw
            )));
        }
        Ok(Self {
            value: raw.to_string(),
        })
    }

    /// Non-throwing factory.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::new(raw).ok()
    }

    /// Generates a fresh random salt.
    pub fn generate() -> Self {
        let mut value = Uuid::new_v4().simple().to_string();
        value.truncate(13);
        Self { value }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Attribute for Salt {
    fn representation(&self) -> Value {
        Value::Text(self.value.clone())
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
