use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap();
}

/// An email address, split into its local part and domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    username: String,
    domain: String,
}

impl Email {
    pub fn new(raw: &str) -> Result<Self> {
        let candidate = raw.trim();
        if !EMAIL_PATTERN.is_match(candidate) {
            return Err(StoreError::Validation(format!(
                "'{}' is not a valid email address",
                raw
            )));
        }
        let Some((username, domain)) = candidate.split_once('@') else {
            return Err(StoreError::Validation(format!(
                "'{}' is not a valid email address",
                raw
            )));
        };
        Ok(Self {
            username: username.to_string(),
            domain: domain.to_string(),
        })
    }

    /// Non-throwing factory.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::new(raw).ok()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn address(&self) -> String {
        format!("{}@{}", self.username, self.domain)
    }
}

impl Attribute for Email {
    fn representation(&self) -> Value {
        Value::Text(self.address())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.domain)
    }
}
