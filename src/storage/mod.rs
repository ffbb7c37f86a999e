mod memory;
mod schema;

use async_trait::async_trait;

use crate::core::{Result, Value};
use crate::result::QueryResult;

pub use memory::MemoryExecutor;
pub use schema::{ColumnSpec, TableSchema};

/// Virtual table names served by the bundled executor so table metadata can
/// be introspected with ordinary SELECTs.
pub const INFORMATION_SCHEMA_COLUMNS: &str = "information_schema.columns";
pub const INFORMATION_SCHEMA_KEY_USAGE: &str = "information_schema.key_column_usage";

/// The storage boundary: executes one parameterized statement at a time.
///
/// `?` placeholders in the statement are bound from `params` in order. The
/// transaction primitives are single-level; the entity manager uses them to
/// make a recursive flush atomic.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    async fn begin(&self) -> Result<()>;

    async fn commit(&self) -> Result<()>;

    async fn rollback(&self) -> Result<()>;
}
