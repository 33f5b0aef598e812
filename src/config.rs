// ==========================================
// Academic Import System - Import Configuration
// ==========================================
// Knobs for one import run. Defaults cover the standard upload
// templates; a JSON file can override them per deployment.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Header rows preceding the data in upload templates.
    pub header_rows: usize,

    /// Hard cap on rows per import attempt; larger uploads are
    /// rejected before validation starts.
    pub max_batch_rows: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header_rows: 1,
            max_batch_rows: 10_000,
        }
    }
}

impl ImportConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.header_rows, 1);
        assert_eq!(config.max_batch_rows, 10_000);
    }

    #[test]
    fn test_partial_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, "{{\"max_batch_rows\": 500}}").unwrap();

        let config = ImportConfig::from_file(file.path()).unwrap();

        assert_eq!(config.max_batch_rows, 500);
        assert_eq!(config.header_rows, 1);
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let result = ImportConfig::from_file("no-such-config.json");
        assert!(matches!(result, Err(ImportError::ConfigReadError { .. })));
    }
}
