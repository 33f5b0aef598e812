// ==========================================
// Academic Import System - Domain Layer
// ==========================================
// Entity catalogue, violation vocabulary, row intermediates.
// No I/O here; everything is plain data.
// ==========================================

pub mod row;
pub mod types;

pub use row::{FieldValue, ImportBatchResult, NormalizedRow, RawCell, RawRow, ValidatedRow};
pub use types::{CommitStatus, EntityType, ErrorCode};
