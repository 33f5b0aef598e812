// ==========================================
// Academic Import System - Core Library
// ==========================================
// Batch import reconciliation for academic entities: an untrusted
// spreadsheet becomes a set of individually valid, mutually
// non-duplicate records safe to commit, plus a precise per-row
// error report for everything rejected.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Schema layer - declarative per-entity rule tables
pub mod schema;

// Import layer - the reconciliation pipeline
pub mod importer;

// Store layer - persistence boundary
pub mod store;

// Configuration
pub mod config;

// SQLite connection infrastructure (unified PRAGMAs)
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Core type re-exports
// ==========================================

pub use config::ImportConfig;

pub use domain::{
    CommitStatus, EntityType, ErrorCode, FieldValue, ImportBatchResult, NormalizedRow, RawCell,
    RawRow, ValidatedRow,
};

pub use schema::{schema_for, EntitySchema, FieldCheck, FieldDescriptor, FieldKind};

pub use importer::{
    classify, BatchImporter, BatchImporterImpl, CsvParser, ExcelParser, ImportError, ImportReport,
    ImportResult, ImportSession, SchemaRowNormalizer, SchemaValidator, UniversalFileParser,
};

pub use store::{ImportStore, SqliteStore};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Academic Batch Import";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
