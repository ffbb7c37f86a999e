use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

const MAX_LENGTH: usize = 80;

lazy_static! {
    static ref NAME_PATTERN: Regex = Regex::new(r"^\p{L}[\p{L}\p{M}' -]*$").unwrap();
}

/// A person's display name: Unicode letters, spaces, apostrophes, hyphens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    value: String,
}

impl PersonName {
    pub fn new(raw: &str) -> Result<Self> {
        let candidate = raw.trim();
        if candidate.is_empty() || candidate.chars().count() > MAX_LENGTH {
            return Err(StoreError::Validation(format!(
                "name must be between 1 and {} characters",
                MAX_LENGTH
            )));
        }
        if !NAME_PATTERN.is_match(candidate) {
            return Err(StoreError::Validation(format!(
                "'{}' is not a valid name",
                raw
            )));
        }
        Ok(Self {
            value: candidate.to_string(),
        })
    }

    /// Non-throwing factory.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::new(raw).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Attribute for PersonName {
    fn representation(&self) -> Value {
        Value::Text(self.value.clone())
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
