use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::core::{Result, StoreError, Value};
use crate::storage::QueryExecutor;

/// Everything the DAO layer needs to know about one table, introspected once
/// and immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct TableMeta {
    pub table: String,
    /// Full column set.
    pub columns: BTreeSet<String>,
    pub primary_key: Option<String>,
    /// True when the engine generates the key; false when the caller must
    /// supply it.
    pub key_generated: bool,
    /// Columns usable for a unique lookup, primary key first.
    pub unique: Vec<String>,
    /// NOT NULL columns without a default that the caller must provide.
    pub required: BTreeSet<String>,
}

const COLUMNS_QUERY: &str =
    "SELECT column_name, extra FROM information_schema.columns WHERE table_name = ?";
const REQUIRED_QUERY: &str = "SELECT column_name FROM information_schema.columns \
     WHERE table_name = ? AND is_nullable = 'NO' \
     AND column_default IS NULL AND extra <> 'auto_increment'";
const KEYS_QUERY: &str = "SELECT column_name, constraint_name \
     FROM information_schema.key_column_usage WHERE table_name = ?";

/// Process-wide table metadata cache, owned by the DAO layer.
///
/// The three information-schema queries run once per table; afterwards every
/// caller shares the same `Arc<TableMeta>`. First access from concurrent
/// tasks is serialized by the write lock, so the introspection cannot run
/// twice.
pub struct MetadataCache {
    executor: Arc<dyn QueryExecutor>,
    tables: RwLock<HashMap<String, Arc<TableMeta>>>,
}

impl MetadataCache {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub async fn table_meta(&self, table: &str) -> Result<Arc<TableMeta>> {
        if let Some(meta) = self.tables.read().await.get(table) {
            return Ok(meta.clone());
        }

        let mut tables = self.tables.write().await;
        if let Some(meta) = tables.get(table) {
            return Ok(meta.clone());
        }

        let meta = Arc::new(self.introspect(table).await?);
        tables.insert(table.to_string(), meta.clone());
        Ok(meta)
    }

    async fn introspect(&self, table: &str) -> Result<TableMeta> {
        debug!(table, "introspecting table metadata");
        let key = [Value::Text(table.to_string())];

        let column_rows = self.executor.execute(COLUMNS_QUERY, &key).await?;
        if column_rows.is_empty() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        let mut columns = BTreeSet::new();
        let mut extras: HashMap<String, String> = HashMap::new();
        for row in &column_rows.rows {
            let Some(name) = row.first().and_then(Value::as_str) else {
                continue;
            };
            columns.insert(name.to_string());
            if let Some(extra) = row.get(1).and_then(Value::as_str) {
                extras.insert(name.to_string(), extra.to_string());
            }
        }

        let required_rows = self.executor.execute(REQUIRED_QUERY, &key).await?;
        let required: BTreeSet<String> = required_rows
            .rows
            .iter()
            .filter_map(|row| row.first().and_then(Value::as_str).map(str::to_string))
            .collect();

        let key_rows = self.executor.execute(KEYS_QUERY, &key).await?;
        let mut primary_key = None;
        let mut unique = Vec::new();
        for row in &key_rows.rows {
            let Some(column) = row.first().and_then(Value::as_str) else {
                continue;
            };
            let constraint = row.get(1).and_then(Value::as_str).unwrap_or_default();
            if constraint == "PRIMARY" && primary_key.is_none() {
                primary_key = Some(column.to_string());
            }
            if !unique.iter().any(|existing| existing == column) {
                unique.push(column.to_string());
            }
        }

        let key_generated = primary_key
            .as_ref()
            .and_then(|pk| extras.get(pk))
            .is_some_and(|extra| extra == "auto_increment");

        Ok(TableMeta {
            table: table.to_string(),
            columns,
            primary_key,
            key_generated,
            unique,
            required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryExecutor;

    #[tokio::test]
    async fn test_metadata_introspection() {
        let executor = Arc::new(MemoryExecutor::new());
        executor
            .execute(
                "CREATE TABLE requests (\
                 request_id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY, \
                 ip TEXT NOT NULL, \
                 port INTEGER NOT NULL, \
                 created_at TEXT NOT NULL)",
                &[],
            )
            .await
            .unwrap();

        let cache = MetadataCache::new(executor);
        let meta = cache.table_meta("requests").await.unwrap();

        assert_eq!(meta.primary_key.as_deref(), Some("request_id"));
        assert!(meta.key_generated);
        assert_eq!(meta.unique, vec!["request_id".to_string()]);
        assert_eq!(meta.columns.len(), 4);
        assert!(meta.required.contains("ip"));
        assert!(meta.required.contains("port"));
        assert!(!meta.required.contains("request_id"));
    }

    #[tokio::test]
    async fn test_unknown_table_is_an_error() {
        let executor = Arc::new(MemoryExecutor::new());
        let cache = MetadataCache::new(executor);

        let err = cache.table_meta("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_metadata_is_cached() {
        let executor = Arc::new(MemoryExecutor::new());
        executor
            .execute("CREATE TABLE tokens (token TEXT PRIMARY KEY)", &[])
            .await
            .unwrap();

        let cache = MetadataCache::new(executor);
        let first = cache.table_meta("tokens").await.unwrap();
        let second = cache.table_meta("tokens").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!first.key_generated);
    }
}
