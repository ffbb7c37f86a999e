use std::fmt;
use std::net::IpAddr;

use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

/// A client address, IPv4 or IPv6, stored in canonical text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ip {
    address: IpAddr,
}

impl Ip {
    pub fn new(raw: &str) -> Result<Self> {
        let address = raw.trim().parse::<IpAddr>().map_err(|_| {
            StoreError::Validation(format!("'{}' is not a valid IP address", raw))
        })?;
        Ok(Self { address })
    }

    /// Non-throwing factory.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::new(raw).ok()
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }
}

impl Attribute for Ip {
    fn representation(&self) -> Value {
        Value::Text(self.address.to_string())
    }
}

impl fmt::Display for Ip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}
