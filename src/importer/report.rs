// ==========================================
// Academic Import System - Report Builder
// ==========================================
// Pure projection from an import session into the counts, the
// ordered invalid-row list, and the commit status. The presentation
// layer maps each violation code to a localized label; that table is
// not part of this engine.
// ==========================================

use crate::domain::types::{CommitStatus, EntityType, ErrorCode};
use crate::importer::commit::ImportSession;
use crate::schema::schema_for;
use serde::{Deserialize, Serialize};

// ==========================================
// InvalidRowReport - one rejected row for presentation
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRowReport {
    /// 1-based line in the source file, header row included.
    pub row_index: usize,
    /// The row's uniqueness-key value, when it had one.
    pub key: Option<String>,
    pub errors: Vec<ErrorCode>,
}

// ==========================================
// ImportReport
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub entity: EntityType,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub total_count: usize,
    pub invalid_rows: Vec<InvalidRowReport>,
    pub status: CommitStatus,
}

impl ImportReport {
    pub fn from_session(session: &ImportSession) -> Self {
        let schema = schema_for(session.entity);
        let invalid_rows = session
            .result
            .invalid_rows
            .iter()
            .map(|validated| InvalidRowReport {
                row_index: validated.row.row_index,
                key: validated
                    .row
                    .key_value(schema.unique_key)
                    .map(|k| k.to_string()),
                errors: validated.errors.clone(),
            })
            .collect();

        Self {
            batch_id: session.batch_id.clone(),
            entity: session.entity,
            valid_count: session.result.valid_count(),
            invalid_count: session.result.invalid_count(),
            total_count: session.result.total_count,
            invalid_rows,
            status: session.status().clone(),
        }
    }
}
