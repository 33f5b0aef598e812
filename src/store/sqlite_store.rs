// ==========================================
// Academic Import System - SQLite Store
// ==========================================
// Local ImportStore implementation. Each entity type lives in its
// own table as uniqueness key + JSON payload; the batch commit is a
// single transaction, so a mid-batch constraint violation rolls the
// whole batch back (all-or-nothing at the boundary call).
// ==========================================

use crate::db::{open_in_memory_connection, open_sqlite_connection};
use crate::domain::types::EntityType;
use crate::importer::error::{ImportError, ImportResult};
use crate::schema::schema_for;
use crate::store::import_store::ImportStore;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// SqliteStore
// ==========================================
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> ImportResult<Self> {
        let conn = open_in_memory_connection()?;
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_tables(conn: &Connection) -> rusqlite::Result<()> {
        for entity in EntityType::ALL {
            conn.execute_batch(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    entity_key TEXT PRIMARY KEY,
                    payload TEXT NOT NULL,
                    imported_at TEXT NOT NULL
                );
                "#,
                table = entity.table_name()
            ))?;
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // a poisoned lock means a panic elsewhere already aborted the
        // import attempt; propagating the inner guard is still sound
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl ImportStore for SqliteStore {
    async fn fetch_existing_keys(&self, entity: EntityType) -> ImportResult<HashSet<String>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT entity_key FROM {}",
            entity.table_name()
        ))?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;

        debug!(entity = %entity, count = keys.len(), "fetched existing keys");
        Ok(keys)
    }

    async fn commit_batch(
        &self,
        entity: EntityType,
        payloads: Vec<Value>,
    ) -> ImportResult<usize> {
        let key_field = schema_for(entity).unique_key;
        let imported_at = Utc::now().to_rfc3339();

        let mut conn = self.lock();
        let tx = conn.transaction().map_err(ImportError::from)?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (entity_key, payload, imported_at) VALUES (?1, ?2, ?3)",
                entity.table_name()
            ))?;

            for payload in &payloads {
                let key = payload
                    .get(key_field)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        ImportError::CommitError(format!(
                            "payload missing uniqueness key {}",
                            key_field
                        ))
                    })?;
                stmt.execute(params![key, payload.to_string(), imported_at])?;
                count += 1;
            }
        }

        tx.commit().map_err(ImportError::from)?;
        debug!(entity = %entity, count = count, "batch committed");
        Ok(count)
    }
}
