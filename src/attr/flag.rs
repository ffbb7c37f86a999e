use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

/// An account-active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFlag {
    value: bool,
}

impl ActiveFlag {
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    /// Builds a flag from a raw storage value (boolean or 0/1 integer).
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(Self::new(*b)),
            Value::Integer(i) => Ok(Self::new(*i != 0)),
            other => Err(StoreError::TypeMismatch(format!(
                "{} is not a boolean flag",
                other.type_name()
            ))),
        }
    }

    pub fn is_set(&self) -> bool {
        self.value
    }
}

impl Attribute for ActiveFlag {
    fn representation(&self) -> Value {
        Value::Boolean(self.value)
    }
}
