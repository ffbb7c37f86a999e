use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::{Record, Result, StoreError, Value};
use crate::meta::{MetadataCache, TableMeta};
use crate::result::QueryResult;
use crate::storage::QueryExecutor;

/// Generic CRUD executor for one table.
///
/// Every operation sanitizes its input against the cached table metadata
/// before building a parameterized statement. Write failures never escape as
/// errors: they are logged and reported as `false`, so callers branch on a
/// boolean instead of catching storage exceptions.
pub struct Dao {
    table: String,
    executor: Arc<dyn QueryExecutor>,
    metadata: Arc<MetadataCache>,
}

impl Dao {
    pub fn new(
        table: impl Into<String>,
        executor: Arc<dyn QueryExecutor>,
        metadata: Arc<MetadataCache>,
    ) -> Self {
        Self {
            table: table.into(),
            executor,
            metadata,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    async fn meta(&self) -> Result<Arc<TableMeta>> {
        self.metadata.table_meta(&self.table).await
    }

    /// Inserts a record. Unknown columns are dropped, an engine-generated
    /// primary key is stripped, and a missing required column rejects the
    /// whole insert.
    pub async fn create(&self, record: &Record) -> Result<bool> {
        Ok(self.run_insert(record).await?.is_some())
    }

    /// Inserts a record and returns the primary key of the new row: the
    /// generated key for identity tables, the supplied key otherwise.
    pub async fn create_returning_id(&self, record: &Record) -> Result<Option<Value>> {
        let meta = self.meta().await?;
        match self.run_insert(record).await? {
            Some(result) => Ok(result.last_insert_id.or_else(|| {
                meta.primary_key
                    .as_ref()
                    .and_then(|pk| record.get(pk).cloned())
            })),
            None => Ok(None),
        }
    }

    async fn run_insert(&self, record: &Record) -> Result<Option<QueryResult>> {
        let meta = self.meta().await?;
        let mut fields = record.retain_columns(&meta.columns);
        if meta.key_generated
            && let Some(pk) = &meta.primary_key
        {
            fields.remove(pk);
        }

        for column in &meta.required {
            if !fields.contains(column) {
                warn!(
                    table = %self.table,
                    column = %column,
                    "insert rejected: required column missing"
                );
                return Ok(None);
            }
        }
        if fields.is_empty() {
            warn!(table = %self.table, "insert rejected: no known columns in record");
            return Ok(None);
        }

        let columns: Vec<&str> = fields.columns();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders
        );
        let params: Vec<Value> = fields.iter().map(|(_, value)| value.clone()).collect();

        debug!(table = %self.table, sql = %sql, "executing insert");
        match self.executor.execute(&sql, &params).await {
            Ok(result) => Ok(Some(result)),
            Err(err) => {
                warn!(table = %self.table, error = %err, "insert failed");
                Ok(None)
            }
        }
    }

    /// Looks a row up by the first unique-lookup column present in the probe
    /// record. `Ok(None)` means no row matched; a probe without any unique
    /// column is a caller error, reported distinctly.
    pub async fn read(&self, record: &Record) -> Result<Option<Record>> {
        let meta = self.meta().await?;
        let probe = meta.unique.iter().find_map(|column| {
            record
                .get(column)
                .filter(|value| !value.is_empty())
                .map(|value| (column.as_str(), value.clone()))
        });
        let Some((column, value)) = probe else {
            return Err(StoreError::Config(format!(
                "no unique lookup column for table '{}' among {:?}",
                self.table,
                record.columns()
            )));
        };

        let sql = format!(
            "SELECT * FROM {} WHERE {} = ? LIMIT 1",
            self.table, column
        );
        debug!(table = %self.table, column, "executing lookup");
        let result = self.executor.execute(&sql, &[value]).await?;

        let Some(row) = result.rows.into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(
            result
                .columns
                .into_iter()
                .zip(row)
                .collect::<Record>(),
        ))
    }

    /// Updates the row addressed by the record's primary key. The key never
    /// appears in the SET clause. `Ok(false)` when the key is missing/empty
    /// or no row was touched.
    pub async fn update(&self, record: &Record) -> Result<bool> {
        let meta = self.meta().await?;
        let Some(pk) = meta.primary_key.clone() else {
            return Err(StoreError::Config(format!(
                "table '{}' has no primary key",
                self.table
            )));
        };

        let mut fields = record.retain_columns(&meta.columns);
        let Some(id) = fields.get(&pk).filter(|value| !value.is_empty()).cloned() else {
            warn!(table = %self.table, "update rejected: primary key missing or empty");
            return Ok(false);
        };
        fields.remove(&pk);
        if fields.is_empty() {
            warn!(table = %self.table, "update rejected: nothing to set");
            return Ok(false);
        }

        let assignments: Vec<String> = fields
            .columns()
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.table,
            assignments.join(", "),
            pk
        );
        let mut params: Vec<Value> = fields.iter().map(|(_, value)| value.clone()).collect();
        params.push(id);

        debug!(table = %self.table, sql = %sql, "executing update");
        match self.executor.execute(&sql, &params).await {
            Ok(result) => Ok(result.rows_affected > 0),
            Err(err) => {
                warn!(table = %self.table, error = %err, "update failed");
                Ok(false)
            }
        }
    }

    /// Deletes the row addressed by the record's primary key. `Ok(false)`
    /// when the key is missing/empty or no row existed.
    pub async fn delete(&self, record: &Record) -> Result<bool> {
        let meta = self.meta().await?;
        let Some(pk) = meta.primary_key.clone() else {
            return Err(StoreError::Config(format!(
                "table '{}' has no primary key",
                self.table
            )));
        };
        let Some(id) = record.get(&pk).filter(|value| !value.is_empty()).cloned() else {
            warn!(table = %self.table, "delete rejected: primary key missing or empty");
            return Ok(false);
        };

        let sql = format!("DELETE FROM {} WHERE {} = ?", self.table, pk);
        debug!(table = %self.table, sql = %sql, "executing delete");
        match self.executor.execute(&sql, &[id]).await {
            Ok(result) => Ok(result.rows_affected > 0),
            Err(err) => {
                warn!(table = %self.table, error = %err, "delete failed");
                Ok(false)
            }
        }
    }
}
