use std::fmt;

use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

/// A TCP/UDP port, 1 through 65535.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    number: u16,
}

impl Port {
    pub fn new(number: i64) -> Result<Self> {
        if !(1..=i64::from(u16::MAX)).contains(&number) {
            return Err(StoreError::Validation(format!(
                "{} is not a valid port",
                number
            )));
        }
        Ok(Self {
            number: number as u16,
        })
    }

    /// Non-throwing factory.
    pub fn parse(number: i64) -> Option<Self> {
        Self::new(number).ok()
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl Attribute for Port {
    fn representation(&self) -> Value {
        Value::Integer(i64::from(self.number))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}
