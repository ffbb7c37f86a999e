//! Persistence core for user accounts.
//!
//! Three layers, leaves first: self-validating attribute value objects
//! ([`Email`], [`PasswordHash`], [`Timestamp`], ...), domain entities with a
//! tracked lifecycle ([`User`], [`Request`], [`Session`]), and the
//! [`EntityManager`] that hydrates entity graphs from rows and flattens them
//! back through a generic per-table [`Dao`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use userstore::{
//!     ActiveFlag, Email, EntityManager, MemoryExecutor, PasswordHash, PersonName,
//!     QueryExecutor, Salt, User,
//! };
//!
//! #[tokio::main]
//! async fn main() -> userstore::Result<()> {
//!     let executor = Arc::new(MemoryExecutor::new());
//!     executor
//!         .execute(
//!             "CREATE TABLE users (\
//!              user_id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY, \
//!              name TEXT NOT NULL, \
//!              email TEXT NOT NULL UNIQUE, \
//!              hash TEXT NOT NULL, \
//!              salt TEXT NOT NULL, \
//!              active BOOLEAN NOT NULL)",
//!             &[],
//!         )
//!         .await?;
//!
//!     let manager = EntityManager::new(executor);
//!
//!     let mut user = User::new(
//!         PersonName::new("Alice Doe")?,
//!         Email::new("alice@example.net")?,
//!         PasswordHash::new("secret")?,
//!         Salt::generate(),
//!         ActiveFlag::new(true),
//!     );
//!     assert!(manager.save(&mut user).await);
//!
//!     let reloaded: Option<User> = manager.find("alice@example.net").await;
//!     assert!(reloaded.is_some());
//!     Ok(())
//! }
//! ```

pub mod attr;
pub mod core;
pub mod dao;
pub mod entity;
pub mod manager;
pub mod meta;
pub mod result;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{DataType, Record, Result, StoreError, Value};
pub use attr::{
    ActiveFlag, Attribute, Email, Ip, PasswordHash, PersonName, Port, PrimaryKey, Salt, Timestamp,
};
pub use dao::Dao;
pub use entity::{Entity, EntityFactory, EntityState, Lifecycle, Request, Session, StateGrant, User};
pub use manager::{EntityManager, ManagerConfig};
pub use meta::{MetadataCache, TableMeta};
pub use result::QueryResult;
pub use storage::{MemoryExecutor, QueryExecutor};
