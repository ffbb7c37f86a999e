use async_trait::async_trait;

use crate::attr::{Attribute, PrimaryKey, Timestamp};
use crate::core::{Record, Result, StoreError, Value};
use crate::entity::{Entity, EntityFactory, EntityState, Lifecycle, Request, StateGrant, User};
use crate::manager::EntityManager;
use crate::record;

/// A login session: optionally bound to a user, always bound to the request
/// that opened it.
#[derive(Debug, Clone)]
pub struct Session {
    id: Option<PrimaryKey>,
    user: Option<User>,
    request: Request,
    expires: Timestamp,
    lifecycle: Lifecycle,
}

impl Session {
    pub fn new(user: Option<User>, request: Request, expires: Timestamp) -> Result<Self> {
        Self::check_user(user.as_ref())?;
        Ok(Self {
            id: None,
            user,
            request,
            expires,
            lifecycle: Lifecycle::new(),
        })
    }

    fn check_user(user: Option<&User>) -> Result<()> {
        if let Some(user) = user
            && !user.is_active()
        {
            return Err(StoreError::Invariant(format!(
                "inactive user '{}' cannot own a session",
                user.email()
            )));
        }
        Ok(())
    }

    pub fn id(&self) -> Option<PrimaryKey> {
        self.id
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn expires(&self) -> &Timestamp {
        &self.expires
    }

    /// Strict comparison: a session expiring exactly now is not yet expired.
    pub fn is_expired(&self, now: &Timestamp) -> bool {
        now.is_after(&self.expires)
    }

    pub fn set_user(&mut self, user: Option<User>) -> Result<()> {
        Self::check_user(user.as_ref())?;
        self.user = user;
        self.lifecycle.touch();
        Ok(())
    }

    /// Replaces the originating request. The replacement must carry a
    /// strictly greater timestamp than the one it supersedes.
    pub fn set_request(&mut self, request: Request) -> Result<()> {
        if !request.is_newer_than(&self.request) {
            return Err(StoreError::Invariant(
                "a replacement request must be strictly newer than the current one".into(),
            ));
        }
        self.request = request;
        self.lifecycle.touch();
        Ok(())
    }

    /// Extends the session. The new expiry must be strictly later.
    pub fn renew(&mut self, expires: Timestamp) -> Result<()> {
        if !expires.is_after(&self.expires) {
            return Err(StoreError::Invariant(
                "a renewed expiry must be strictly later than the current one".into(),
            ));
        }
        self.expires = expires;
        self.lifecycle.touch();
        Ok(())
    }
}

#[async_trait]
impl Entity for Session {
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
            "session_id" => self.id_value(),
            "user_id" => self.user.as_ref().map(|u| u.id_value()).unwrap_or(Value::Null),
            "request_id" => self.request.id_value(),
            "expires_at" => self.expires.representation(),
        }
    }

    async fn flush_children(&mut self, manager: &EntityManager) -> Result<()> {
        if let Some(user) = self.user.as_mut() {
            manager
                .flush_nested(user)
                .await
                .map_err(|e| e.context("flushing session user"))?;
        }
        manager
            .flush_nested(&mut self.request)
            .await
            .map_err(|e| e.context("flushing session request"))?;
        Ok(())
    }
}

#[async_trait]
impl EntityFactory for Session {
    const TABLE: &'static str = "sessions";
    const ID_FIELD: &'static str = "session_id";

    fn unique_field_for(_key: &Value) -> &'static str {
        Self::ID_FIELD
    }

    async fn from_record(manager: &EntityManager, record: &Record) -> Result<Self> {
        let id = PrimaryKey::from_value(record.require(Self::ID_FIELD)?)?;

        // An empty foreign key means an anonymous session.
        let user = match record.get("user_id") {
            Some(value) if !value.is_empty() => Some(
                manager
                    .init::<User>(value.clone())
                    .await
                    .map_err(|e| e.context(format!("resolving user '{}'", value)))?,
            ),
            _ => None,
        };

        let request_key = record.require("request_id")?;
        if request_key.is_empty() {
            return Err(StoreError::Config(
                "session row carries no originating request".into(),
            ));
        }
        let request = manager
            .init::<Request>(request_key.clone())
            .await
            .map_err(|e| e.context(format!("resolving request '{}'", request_key)))?;

        let expires = Timestamp::new(&record.require_text("expires_at")?)?;

        Self::check_user(user.as_ref())?;
        Ok(Self {
            id: Some(id),
            user,
            request,
            expires,
            lifecycle: Lifecycle::new(),
        })
    }
}
