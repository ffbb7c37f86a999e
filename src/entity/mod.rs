mod request;
mod session;
mod state;
mod user;

use async_trait::async_trait;

use crate::core::{Record, Result, Value};
use crate::manager::EntityManager;

pub use request::Request;
pub use session::Session;
pub use state::{EntityState, Lifecycle, StateGrant};
pub use user::User;

/// Instance contract of a persistence-aware domain object.
///
/// Implementors embed a [`Lifecycle`] cell; every attribute setter must go
/// through [`Lifecycle::touch`] so unsaved changes become observable as
/// `Detached`. State transitions to `Persistent`/`Removed` require the
/// manager's [`StateGrant`].
#[async_trait]
pub trait Entity: Send + Sync {
    fn table_name(&self) -> &'static str;

    /// Name of the primary-key column.
    fn id_field(&self) -> &'static str;

    fn state(&self) -> EntityState;

    fn set_state(&mut self, next: EntityState, grant: &StateGrant);

    /// The canonical scalar form of this entity when referenced from another
    /// row: its primary key, `Null` while unsaved.
    fn id_value(&self) -> Value;

    /// Adopts the key generated by an insert.
    fn assign_id(&mut self, id: Value, grant: &StateGrant) -> Result<()>;

    /// Flattens the entity into a storage record: attributes collapse to
    /// their representation, nested entities to their id value.
    fn to_record(&self) -> Record;

    /// Writes nested entities before this entity's own row, via
    /// [`EntityManager::flush_nested`]. Default: no children.
    async fn flush_children(&mut self, _manager: &EntityManager) -> Result<()> {
        Ok(())
    }
}

/// Type-level contract: how to find and rebuild an entity of this type.
///
/// `from_record` is the statically-typed hydration path; nested entity
/// references are resolved recursively through the manager.
#[async_trait]
pub trait EntityFactory: Entity + Sized {
    const TABLE: &'static str;
    const ID_FIELD: &'static str;

    /// Maps a candidate lookup value to the column to query by, enabling
    /// lookup by alternate keys (e.g. an email instead of a numeric id).
    fn unique_field_for(key: &Value) -> &'static str;

    async fn from_record(manager: &EntityManager, record: &Record) -> Result<Self>;
}
