// ==========================================
// Academic Import System - Import Trait Seams
// ==========================================
// Component interfaces only; no implementations here.
// ==========================================

use crate::domain::row::{NormalizedRow, RawRow, ValidatedRow};
use crate::domain::types::EntityType;
use crate::importer::commit::ImportSession;
use crate::importer::error::ImportResult;
use crate::importer::report::ImportReport;
use crate::schema::EntitySchema;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Uniqueness-key values already present in the store, snapshotted
/// once per run.
pub type ExistingKeys = HashSet<String>;

/// Valid reference keys per cross-referencing field name
/// (e.g. "semester_id" -> known semester IDs).
pub type ReferenceSets = HashMap<&'static str, HashSet<String>>;

// ==========================================
// FileParser - file to raw row sequence (stage 0)
// ==========================================
// Implementors: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// Parse a file into ordered raw rows (column label -> cell).
    /// The header row is consumed here; data rows keep their original
    /// input position. Empty input or a missing header is fatal.
    fn parse(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// RowNormalizer - raw row to canonical fields (stage 1)
// ==========================================
// Implementor: SchemaRowNormalizer
pub trait RowNormalizer: Send + Sync {
    /// Map one raw row onto the schema's canonical fields, coercing
    /// cell values by field kind. Never fails and never drops a row;
    /// anything unusable resolves to an empty or invalid sentinel.
    fn normalize(&self, row: &RawRow, schema: &EntitySchema) -> NormalizedRow;

    fn normalize_batch(&self, rows: &[RawRow], schema: &EntitySchema) -> Vec<NormalizedRow> {
        rows.iter().map(|row| self.normalize(row, schema)).collect()
    }
}

// ==========================================
// ValidatorEngine - ordered violation codes per row (stage 2)
// ==========================================
// Implementor: SchemaValidator
pub trait ValidatorEngine: Send + Sync {
    /// Validate the whole batch against the schema, the existing-store
    /// snapshot, and the caller-supplied reference sets. Violation
    /// order per row is fixed: store duplicate, batch duplicate,
    /// missing required, format checks, cross-reference checks.
    fn validate_batch(
        &self,
        schema: &EntitySchema,
        rows: Vec<NormalizedRow>,
        existing: &ExistingKeys,
        references: &ReferenceSets,
    ) -> Vec<ValidatedRow>;
}

// ==========================================
// BatchImporter - pipeline orchestrator
// ==========================================
// Implementor: BatchImporterImpl
#[async_trait]
pub trait BatchImporter: Send + Sync {
    /// Run the preview half of the pipeline on collaborator-supplied
    /// rows: fetch snapshot, normalize, validate, classify. Returns
    /// the session awaiting user confirmation.
    async fn preview_rows(
        &self,
        entity: EntityType,
        rows: Vec<RawRow>,
    ) -> ImportResult<ImportSession>;

    /// Parse a spreadsheet file, then run the preview half.
    async fn preview_file<P: AsRef<Path> + Send>(
        &self,
        entity: EntityType,
        file_path: P,
    ) -> ImportResult<ImportSession>;

    /// Commit the session's valid subset as one batch write.
    /// At most one commit may be in flight per session; a committed
    /// session cannot be committed again.
    async fn commit(&self, session: &mut ImportSession) -> ImportResult<usize>;

    /// Convenience: preview and commit several files concurrently,
    /// one independent session per file.
    async fn import_files<P: AsRef<Path> + Send + Sync>(
        &self,
        entity: EntityType,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportReport, String>>;
}
