use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::core::{Record, Result, StoreError, Value};
use crate::dao::Dao;
use crate::entity::{Entity, EntityFactory, EntityState, StateGrant};
use crate::meta::MetadataCache;
use crate::storage::QueryExecutor;

/// Behavior switches for the manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    transactional_flush: bool,
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self {
            transactional_flush: true,
        }
    }

    /// When enabled (the default), a flush wraps its recursive walk in one
    /// executor transaction and a nested write failure rolls everything
    /// back. When disabled, nested failures are logged and swallowed.
    pub fn transactional_flush(mut self, enabled: bool) -> Self {
        self.transactional_flush = enabled;
        self
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hydrates entities from rows and flattens them back, driving the lifecycle
/// state machine. Holds the only [`StateGrant`], so `Persistent` and
/// `Removed` are reachable exclusively through it.
///
/// The throwing API (`init`/`flush`/`del`) carries full error causes; the
/// entity-facing API (`find`/`save`/`remove`) never fails loudly — causes go
/// to the log, callers get `Option`/`bool`.
pub struct EntityManager {
    executor: Arc<dyn QueryExecutor>,
    metadata: Arc<MetadataCache>,
    daos: RwLock<HashMap<String, Arc<Dao>>>,
    config: ManagerConfig,
    grant: StateGrant,
}

impl EntityManager {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self::with_config(executor, ManagerConfig::default())
    }

    pub fn with_config(executor: Arc<dyn QueryExecutor>, config: ManagerConfig) -> Self {
        let metadata = Arc::new(MetadataCache::new(executor.clone()));
        Self {
            executor,
            metadata,
            daos: RwLock::new(HashMap::new()),
            config,
            grant: StateGrant::new(),
        }
    }

    /// The DAO for one table, created on first use and shared afterwards.
    pub async fn dao_for(&self, table: &str) -> Arc<Dao> {
        if let Some(dao) = self.daos.read().await.get(table) {
            return dao.clone();
        }
        let mut daos = self.daos.write().await;
        daos.entry(table.to_string())
            .or_insert_with(|| {
                Arc::new(Dao::new(table, self.executor.clone(), self.metadata.clone()))
            })
            .clone()
    }

    /// Hydrates an entity by a unique key.
    ///
    /// A missing row is reported as [`StoreError::NotFound`], distinct from
    /// every other failure; nested hydration failures are wrapped with
    /// context and re-raised.
    pub async fn init<E: EntityFactory>(&self, key: Value) -> Result<E> {
        let dao = self.dao_for(E::TABLE).await;
        let column = E::unique_field_for(&key);

        let mut probe = Record::new();
        probe.set(column, key.clone());
        let Some(row) = dao.read(&probe).await? else {
            return Err(StoreError::not_found(E::TABLE, &key));
        };

        let mut entity = E::from_record(self, &row)
            .await
            .map_err(|e| e.context(format!("hydrating '{}' by {} = '{}'", E::TABLE, column, key)))?;
        entity.set_state(EntityState::Persistent, &self.grant);
        Ok(entity)
    }

    /// Synchronizes an entity with storage.
    ///
    /// `Persistent` and `Removed` entities have nothing to synchronize:
    /// no-op, `Ok(false)`. A `Transient` entity is inserted and adopts the
    /// generated key; a `Detached` entity is updated. On success the state
    /// becomes `Persistent` and the result is `Ok(true)`.
    pub async fn flush<E: Entity + ?Sized>(&self, entity: &mut E) -> Result<bool> {
        if matches!(
            entity.state(),
            EntityState::Persistent | EntityState::Removed
        ) {
            return Ok(false);
        }

        if !self.config.transactional_flush {
            return self.flush_tree(entity).await;
        }

        self.executor.begin().await?;
        match self.flush_tree(entity).await {
            Ok(flushed) => {
                self.executor.commit().await?;
                Ok(flushed)
            }
            Err(err) => {
                if let Err(rollback_err) = self.executor.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed flush also failed");
                }
                Err(err)
            }
        }
    }

    async fn flush_tree<E: Entity + ?Sized>(&self, entity: &mut E) -> Result<bool> {
        if let Err(err) = entity.flush_children(self).await {
            if self.config.transactional_flush {
                return Err(err);
            }
            // Legacy fire-and-forget mode: the parent write still proceeds.
            warn!(
                table = entity.table_name(),
                error = %err,
                "nested entity flush failed; continuing"
            );
        }

        let record = entity.to_record();
        let dao = self.dao_for(entity.table_name()).await;

        match entity.state() {
            EntityState::Transient => {
                let Some(id) = dao.create_returning_id(&record).await? else {
                    return Err(StoreError::Execution(format!(
                        "insert into '{}' failed",
                        entity.table_name()
                    )));
                };
                entity.assign_id(id, &self.grant)?;
            }
            EntityState::Detached => {
                if !dao.update(&record).await? {
                    return Err(StoreError::Execution(format!(
                        "update of '{}' affected no rows",
                        entity.table_name()
                    )));
                }
            }
            EntityState::Persistent | EntityState::Removed => return Ok(false),
        }

        entity.set_state(EntityState::Persistent, &self.grant);
        debug!(table = entity.table_name(), id = %entity.id_value(), "entity flushed");
        Ok(true)
    }

    /// Recursion entry for `flush_children` implementations: writes a nested
    /// entity without opening another transaction. A clean child is a no-op.
    /// In fire-and-forget mode each child failure is swallowed here, so the
    /// remaining children and the parent row still get written.
    pub async fn flush_nested<E: Entity + ?Sized>(&self, entity: &mut E) -> Result<()> {
        match entity.state() {
            EntityState::Persistent | EntityState::Removed => Ok(()),
            _ => match self.flush_tree(entity).await {
                Ok(_) => Ok(()),
                Err(err) if !self.config.transactional_flush => {
                    warn!(
                        table = entity.table_name(),
                        error = %err,
                        "nested entity flush failed; continuing"
                    );
                    Ok(())
                }
                Err(err) => Err(err),
            },
        }
    }

    /// Deletes the row behind a `Persistent` entity. On success the entity
    /// becomes `Removed` and is no longer usable for writes.
    pub async fn del<E: Entity + ?Sized>(&self, entity: &mut E) -> Result<bool> {
        if entity.state() != EntityState::Persistent {
            return Ok(false);
        }

        let dao = self.dao_for(entity.table_name()).await;
        let mut key = Record::new();
        key.set(entity.id_field(), entity.id_value());

        let removed = dao.delete(&key).await?;
        if removed {
            entity.set_state(EntityState::Removed, &self.grant);
        }
        Ok(removed)
    }

    /// Non-throwing lookup: `None` both when no row matches and when
    /// hydration fails; the cause is logged, never surfaced.
    pub async fn find<E: EntityFactory>(&self, key: impl Into<Value>) -> Option<E> {
        let key = key.into();
        match self.init::<E>(key.clone()).await {
            Ok(entity) => Some(entity),
            // Only the entity's own missing row is a quiet miss; a nested
            // not-found arrives wrapped in context and is logged below.
            Err(StoreError::NotFound(..)) => {
                debug!(table = E::TABLE, key = %key, "no matching row");
                None
            }
            Err(err) => {
                warn!(table = E::TABLE, key = %key, error = %err, "hydration failed");
                None
            }
        }
    }

    /// Non-throwing flush.
    pub async fn save<E: Entity + ?Sized>(&self, entity: &mut E) -> bool {
        match self.flush(entity).await {
            Ok(flushed) => flushed,
            Err(err) => {
                warn!(table = entity.table_name(), error = %err, "flush failed");
                false
            }
        }
    }

    /// Non-throwing delete.
    pub async fn remove<E: Entity + ?Sized>(&self, entity: &mut E) -> bool {
        match self.del(entity).await {
            Ok(removed) => removed,
            Err(err) => {
                warn!(table = entity.table_name(), error = %err, "delete failed");
                false
            }
        }
    }
}
