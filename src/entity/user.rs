use async_trait::async_trait;

use crate::attr::{ActiveFlag, Attribute, Email, PasswordHash, PersonName, PrimaryKey, Salt};
use crate::core::{Record, Result, Value};
use crate::entity::{Entity, EntityFactory, EntityState, Lifecycle, StateGrant};
use crate::manager::EntityManager;
use crate::record;

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    id: Option<PrimaryKey>,
    name: PersonName,
    email: Email,
    hash: PasswordHash,
    salt: Salt,
    active: ActiveFlag,
    lifecycle: Lifecycle,
}

impl User {
    pub fn new(
        name: PersonName,
        email: Email,
        hash: PasswordHash,
        salt: Salt,
        active: ActiveFlag,
    ) -> Self {
        Self {
            id: None,
            name,
            email,
            hash,
            salt,
            active,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn id(&self) -> Option<PrimaryKey> {
        self.id
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn is_active(&self) -> bool {
        self.active.is_set()
    }

    pub fn verify_password(&self, raw: &str) -> bool {
        self.hash.verify(raw)
    }

    pub fn set_name(&mut self, name: PersonName) {
        self.name = name;
        self.lifecycle.touch();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.lifecycle.touch();
    }

    /// Replaces the stored digest; accepts a raw secret or a digest.
    pub fn set_password(&mut self, input: &str) -> Result<()> {
        self.hash.rehash(input)?;
        self.lifecycle.touch();
        Ok(())
    }

    pub fn set_salt(&mut self, salt: Salt) {
        self.salt = salt;
        self.lifecycle.touch();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = ActiveFlag::new(active);
        self.lifecycle.touch();
    }
}

#[async_trait]
impl Entity for User {
    fn table_name(&self) -> &'static str {
        Self::TABLE
    }

    fn id_field(&self) -> &'static str {
        Self::ID_FIELD
    }

    fn state(&self) -> EntityState {
        self.lifecycle.state()
    }

    fn set_state(&mut self, next: EntityState, grant: &StateGrant) {
        self.lifecycle.advance(next, grant);
    }

    fn id_value(&self) -> Value {
        self.id
            .as_ref()
            .map(Attribute::representation)
            .unwrap_or(Value::Null)
    }

    fn assign_id(&mut self, id: Value, _grant: &StateGrant) -> Result<()> {
        self.id = Some(PrimaryKey::from_value(&id)?);
        Ok(())
    }

    fn to_record(&self) -> Record {
        record! {
            "user_id" => self.id_value(),
            "name" => self.name.representation(),
            "email" => self.email.representation(),
            "hash" => self.hash.representation(),
            "salt" => self.salt.representation(),
            "active" => self.active.representation(),
        }
    }
}

#[async_trait]
impl EntityFactory for User {
    const TABLE: &'static str = "users";
    const ID_FIELD: &'static str = "user_id";

    fn unique_field_for(key: &Value) -> &'static str {
        match key {
            Value::Text(s) if s.contains('@') => "email",
            _ => Self::ID_FIELD,
        }
    }

    async fn from_record(_manager: &EntityManager, record: &Record) -> Result<Self> {
        let id = PrimaryKey::from_value(record.require(Self::ID_FIELD)?)?;
        let name = PersonName::new(&record.require_text("name")?)?;
        let email = Email::new(&record.require_text("email")?)?;
        let hash = PasswordHash::new(&record.require_text("hash")?)?;
        let salt = Salt::new(&record.require_text("salt")?)?;
        let active = ActiveFlag::from_value(record.require("active")?)?;

        Ok(Self {
            id: Some(id),
            name,
            email,
            hash,
            salt,
            active,
            lifecycle: Lifecycle::new(),
        })
    }
}
