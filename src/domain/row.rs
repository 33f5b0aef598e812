// ==========================================
// Academic Import System - Row Model
// ==========================================
// Import pipeline intermediates: raw cells from the file-parsing
// collaborator, normalized field values, validated rows, and the
// classified batch result.
// Lifecycle: all of these live for one import attempt only.
// ==========================================

use crate::domain::types::ErrorCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// RawCell - one untyped cell as parsed from the input file
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ==========================================
// RawRow - one input row keyed by column label
// ==========================================
// `position` is the 0-based position in the input sequence, before
// any header offset is applied. Consumed once by the normalizer.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub position: usize,
    pub cells: HashMap<String, RawCell>,
}

impl RawRow {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            cells: HashMap::new(),
        }
    }

    pub fn with_cell(mut self, label: &str, cell: RawCell) -> Self {
        self.cells.insert(label.to_string(), cell);
        self
    }

    /// True when every cell is blank (such rows are skipped upstream,
    /// but collaborator-supplied row sequences may still contain them).
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|c| c.is_empty())
    }
}

// ==========================================
// FieldValue - one coerced canonical field value
// ==========================================
// `Empty` is the absence sentinel (missing column, wrong alias, blank
// cell, or a non-numeric cell in a number field). `Invalid` marks a
// non-empty cell that failed date coercion; it is distinct from Empty
// so a required date reports either missing_required or the field's
// invalid-date code, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Invalid,
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldValue::Invalid)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

// ==========================================
// NormalizedRow - canonical field values for one entity instance
// ==========================================
// Built by the normalizer; immutable thereafter. `row_index` is the
// 1-based position in the original file (header rows included) so a
// rejected row can be located in the source even after classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub row_index: usize,
    pub values: HashMap<String, FieldValue>,
}

impl NormalizedRow {
    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            values: HashMap::new(),
        }
    }

    /// Field value by canonical name; absent fields read as Empty.
    pub fn field(&self, name: &str) -> &FieldValue {
        self.values.get(name).unwrap_or(&FieldValue::Empty)
    }

    /// The row's uniqueness-key value, when present as text.
    pub fn key_value(&self, key_field: &str) -> Option<&str> {
        self.field(key_field).as_text()
    }
}

// ==========================================
// ValidatedRow - normalized row + ordered violation codes
// ==========================================
// Validity is derived, never stored: valid iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRow {
    #[serde(flatten)]
    pub row: NormalizedRow,
    pub errors: Vec<ErrorCode>,
}

impl ValidatedRow {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// ==========================================
// ImportBatchResult - classified output of one validation run
// ==========================================
// Built once per run; the valid subset feeds the commit coordinator,
// the whole of it feeds the report builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatchResult {
    pub valid_rows: Vec<ValidatedRow>,
    pub invalid_rows: Vec<ValidatedRow>,
    pub total_count: usize,
}

impl ImportBatchResult {
    pub fn valid_count(&self) -> usize {
        self.valid_rows.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid_rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_cell_blankness() {
        assert!(RawCell::Empty.is_empty());
        assert!(RawCell::Text("   ".to_string()).is_empty());
        assert!(!RawCell::Text("GV001".to_string()).is_empty());
        assert!(!RawCell::Number(0.0).is_empty());
    }

    #[test]
    fn test_missing_field_reads_as_empty() {
        let row = NormalizedRow::new(2);
        assert!(row.field("lecturer_id").is_empty());
        assert_eq!(row.key_value("lecturer_id"), None);
    }

    #[test]
    fn test_validity_is_derived() {
        let mut row = ValidatedRow {
            row: NormalizedRow::new(2),
            errors: vec![],
        };
        assert!(row.is_valid());
        row.errors.push(ErrorCode::DuplicateId);
        assert!(!row.is_valid());
    }
}
