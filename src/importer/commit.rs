// ==========================================
// Academic Import System - Commit Coordinator
// ==========================================
// Stage 4: one ImportSession per import attempt, holding the
// classified result across the preview -> confirm -> commit
// interaction. Exactly the valid subset is submitted, stripped to
// plain entity payloads, as a single batch call. A boolean gate
// keeps at most one commit in flight; a boundary failure returns the
// session to a committable state with the working set intact.
// ==========================================

use crate::domain::row::ImportBatchResult;
use crate::domain::types::{CommitStatus, EntityType};
use crate::importer::error::{ImportError, ImportResult};
use crate::schema::{schema_for, FieldKind};
use crate::store::ImportStore;
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

// ==========================================
// ImportSession
// ==========================================
#[derive(Debug)]
pub struct ImportSession {
    pub batch_id: String,
    pub entity: EntityType,
    pub result: ImportBatchResult,
    status: CommitStatus,
}

impl ImportSession {
    pub fn new(entity: EntityType, result: ImportBatchResult) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            entity,
            result,
            status: CommitStatus::Idle,
        }
    }

    pub fn status(&self) -> &CommitStatus {
        &self.status
    }

    /// The valid rows reduced to plain entity payloads: canonical
    /// field -> JSON value, empty fields omitted, no errors and no
    /// row_index.
    pub fn payloads(&self) -> Vec<Value> {
        let schema = schema_for(self.entity);
        self.result
            .valid_rows
            .iter()
            .map(|validated| {
                let mut object = Map::new();
                for field in &schema.fields {
                    let value = validated.row.field(field.name);
                    let json_value = match (field.kind, value) {
                        (_, v) if v.is_empty() || v.is_invalid() => continue,
                        (FieldKind::Date, v) => match v.as_date() {
                            Some(d) => json!(d.format("%Y-%m-%d").to_string()),
                            None => continue,
                        },
                        (FieldKind::Number, v) => match v.as_number() {
                            Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => json!(n as i64),
                            Some(n) => json!(n),
                            None => continue,
                        },
                        (_, v) => match v.as_text() {
                            Some(t) => json!(t),
                            None => continue,
                        },
                    };
                    object.insert(field.name.to_string(), json_value);
                }
                Value::Object(object)
            })
            .collect()
    }

    /// Submit the valid subset to the persistence boundary.
    ///
    /// Gate semantics:
    /// - a second call while a commit is in flight is rejected, never
    ///   resubmitted;
    /// - a committed session cannot be committed again;
    /// - on boundary failure the session becomes Failed but keeps
    ///   both row sets, so the user may retry without re-validating.
    pub async fn commit(&mut self, store: &dyn ImportStore) -> ImportResult<usize> {
        match &self.status {
            CommitStatus::Committing => return Err(ImportError::CommitInFlight),
            CommitStatus::Committed(n) => return Err(ImportError::AlreadyCommitted(*n)),
            CommitStatus::Idle | CommitStatus::Failed(_) => {}
        }

        let payloads = self.payloads();
        info!(
            batch_id = %self.batch_id,
            entity = %self.entity,
            rows = payloads.len(),
            "submitting batch commit"
        );

        self.status = CommitStatus::Committing;
        match store.commit_batch(self.entity, payloads).await {
            Ok(count) => {
                info!(batch_id = %self.batch_id, count = count, "batch commit succeeded");
                self.status = CommitStatus::Committed(count);
                Ok(count)
            }
            Err(err) => {
                warn!(batch_id = %self.batch_id, error = %err, "batch commit failed");
                self.status = CommitStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn force_status(&mut self, status: CommitStatus) {
        self.status = status;
    }
}
