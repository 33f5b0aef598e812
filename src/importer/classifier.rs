// ==========================================
// Academic Import System - Classifier
// ==========================================
// Stage 3: partition validated rows into the valid and invalid sets.
// Pure, O(n), order-preserving; no row is lost and none lands in
// both sets.
// ==========================================

use crate::domain::row::{ImportBatchResult, ValidatedRow};

pub fn classify(rows: Vec<ValidatedRow>) -> ImportBatchResult {
    let total_count = rows.len();
    let (valid_rows, invalid_rows): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|row| row.is_valid());

    ImportBatchResult {
        valid_rows,
        invalid_rows,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::row::NormalizedRow;
    use crate::domain::types::ErrorCode;

    fn row(index: usize, errors: Vec<ErrorCode>) -> ValidatedRow {
        ValidatedRow {
            row: NormalizedRow::new(index),
            errors,
        }
    }

    #[test]
    fn test_partition_is_exact_and_ordered() {
        let rows = vec![
            row(2, vec![]),
            row(3, vec![ErrorCode::DuplicateId]),
            row(4, vec![]),
            row(5, vec![ErrorCode::MissingRequired]),
            row(6, vec![]),
        ];

        let result = classify(rows);

        assert_eq!(result.total_count, 5);
        assert_eq!(
            result.valid_rows.iter().map(|r| r.row.row_index).collect::<Vec<_>>(),
            vec![2, 4, 6]
        );
        assert_eq!(
            result
                .invalid_rows
                .iter()
                .map(|r| r.row.row_index)
                .collect::<Vec<_>>(),
            vec![3, 5]
        );
        assert_eq!(result.valid_count() + result.invalid_count(), 5);
    }

    #[test]
    fn test_empty_batch() {
        let result = classify(vec![]);
        assert_eq!(result.total_count, 0);
        assert!(result.valid_rows.is_empty());
        assert!(result.invalid_rows.is_empty());
    }
}
