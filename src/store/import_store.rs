// ==========================================
// Academic Import System - Store Boundary
// ==========================================
// The persistence boundary owns exactly two operations: the
// existing-snapshot fetch and the batch commit. Nothing else about
// the host store is specified or assumed.
// ==========================================

use crate::domain::types::EntityType;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;

// ==========================================
// ImportStore Trait
// ==========================================
// Implementors: SqliteStore (local), or any adapter over the host
// store's bulk API.
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// Snapshot of all uniqueness-key values currently stored for the
    /// entity type. Fetched once per import run and treated as
    /// read-only for its duration; a store change between snapshot
    /// and commit is a store-level conflict, not detectable here.
    async fn fetch_existing_keys(&self, entity: EntityType) -> ImportResult<HashSet<String>>;

    /// Insert the payloads as one batch, all-or-nothing at this call
    /// level. Returns the committed count on success. The engine does
    /// no row-level retry; partial failure reported by a store is
    /// treated as an opaque failure of the whole batch.
    async fn commit_batch(&self, entity: EntityType, payloads: Vec<Value>)
        -> ImportResult<usize>;
}
