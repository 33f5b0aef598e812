// ==========================================
// Academic Import System - Import Error Types
// ==========================================
// thiserror derive; data-quality violations are NOT here - they are
// ErrorCode values on the row. This enum covers fatal input
// conditions and transport/boundary failures only.
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== Fatal input conditions (pre-validation) =====
    #[error("input contains no data rows")]
    EmptyInput,

    #[error("input has no header row")]
    MissingHeader,

    #[error("batch of {rows} rows exceeds the configured cap of {cap}")]
    BatchTooLarge { rows: usize, cap: usize },

    // ===== Commit gate violations =====
    #[error("a commit for this import session is already in flight")]
    CommitInFlight,

    #[error("this import session was already committed ({0} records)")]
    AlreadyCommitted(usize),

    // ===== Store/boundary failures (retryable) =====
    #[error("snapshot fetch failed: {0}")]
    SnapshotFetchError(String),

    #[error("batch commit failed: {0}")]
    CommitError(String),

    #[error("store error: {0}")]
    StoreError(String),

    // ===== Config =====
    #[error("config read failed ({path}): {message}")]
    ConfigReadError { path: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::StoreError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias for the import pipeline.
pub type ImportResult<T> = Result<T, ImportError>;
