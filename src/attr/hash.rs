use lazy_static::lazy_static;
use regex::Regex;

use crate::attr::Attribute;
use crate::core::{Result, StoreError, Value};

lazy_static! {
    static ref BCRYPT_PATTERN: Regex =
        Regex::new(r"^\$2[abxy]\$\d{2}\$[./A-Za-z0-9]{53}$").unwrap();
}

/// A password digest.
///
/// Construction accepts either a raw secret (which gets hashed) or an
/// already-hashed digest, detected by format probe — so hashing is idempotent
/// and a value loaded back from storage is stored unchanged. The raw secret
/// is never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    digest: String,
}

impl PasswordHash {
    pub fn new(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(StoreError::Validation("password must not be empty".into()));
        }
        if Self::is_digest(input) {
            return Ok(Self {
                digest: input.to_string(),
            });
        }
        let digest = bcrypt::hash(input, bcrypt::DEFAULT_COST)
            .map_err(|e| StoreError::Validation(format!("password hashing failed: {}", e)))?;
        Ok(Self { digest })
    }

    /// Non-throwing factory.
    pub fn parse(input: &str) -> Option<Self> {
        Self::new(input).ok()
    }

    /// Format probe for an already-hashed value.
    pub fn is_digest(candidate: &str) -> bool {
        BCRYPT_PATTERN.is_match(candidate)
    }

    /// One-way comparison against a raw secret.
    pub fn verify(&self, raw: &str) -> bool {
        bcrypt::verify(raw, &self.digest).unwrap_or(false)
    }

    /// Replaces the stored digest. Accepts raw or already-hashed input, like
    /// the constructor.
    pub fn rehash(&mut self, input: &str) -> Result<()> {
        *self = Self::new(input)?;
        Ok(())
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl Attribute for PasswordHash {
    fn representation(&self) -> Value {
        Value::Text(self.digest.clone())
    }
}
