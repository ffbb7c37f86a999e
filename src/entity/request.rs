use async_trait::async_trait;

use crate::attr::{Attribute, Ip, Port, PrimaryKey, Timestamp};
use crate::core::{Record, Result, Value};
use crate::entity::{Entity, EntityFactory, EntityState, Lifecycle, StateGrant};
use crate::manager::EntityManager;
use crate::record;

/// One client contact: where a request came from and when.
#[derive(Debug, Clone)]
pub struct Request {
    id: Option<PrimaryKey>,
    ip: Ip,
    port: Port,
    created: Timestamp,
    lifecycle: Lifecycle,
}

impl Request {
    pub fn new(ip: Ip, port: Port, created: Timestamp) -> Self {
        Self {
            id: None,
            ip,
            port,
            created,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn id(&self) -> Option<PrimaryKey> {
        self.id
    }

    pub fn ip(&self) -> &Ip {
        &self.ip
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn created(&self) -> &Timestamp {
        &self.created
    }

    /// Strictly-newer comparison used when one request replaces another.
    pub fn is_newer_than(&self, other: &Request) -> bool {
        self.created.is_after(&other.created)
    }

    pub fn set_ip(&mut self, ip: Ip) {
        self.ip = ip;
        self.lifecycle.touch();
    }

    pub fn set_port(&mut self, port: Port) {
        self.port = port;
        self.lifecycle.touch();
    }
}

#[async_trait]
impl Entity for Request {
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
            "request_id" => self.id_value(),
            "ip" => self.ip.representation(),
            "port" => self.port.representation(),
            "created_at" => self.created.representation(),
        }
    }
}

#[async_trait]
impl EntityFactory for Request {
    const TABLE: &'static str = "requests";
    const ID_FIELD: &'static str = "request_id";

    fn unique_field_for(_key: &Value) -> &'static str {
        Self::ID_FIELD
    }

    async fn from_record(_manager: &EntityManager, record: &Record) -> Result<Self> {
        let id = PrimaryKey::from_value(record.require(Self::ID_FIELD)?)?;
        let ip = Ip::new(&record.require_text("ip")?)?;
        let port = Port::new(record.require_int("port")?)?;
        let created = Timestamp::new(&record.require_text("created_at")?)?;

        Ok(Self {
            id: Some(id),
            ip,
            port,
            created,
            lifecycle: Lifecycle::new(),
        })
    }
}
