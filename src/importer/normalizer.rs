// ==========================================
// Academic Import System - Row Normalizer
// ==========================================
// Stage 1: RawRow -> NormalizedRow against an entity schema.
// Alias lookup (first match wins), kind-driven coercion, origin row
// index. Normalization never errors and never drops a row.
// ==========================================

use crate::domain::row::{FieldValue, NormalizedRow, RawCell, RawRow};
use crate::importer::traits::RowNormalizer;
use crate::schema::{EntitySchema, FieldDescriptor, FieldKind};
use chrono::{Duration, NaiveDate};

/// Spreadsheet date serial epoch (Excel's day 0).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Serial numbers outside this window are not treated as dates.
const SERIAL_MIN: f64 = 1.0;
const SERIAL_MAX: f64 = 100_000.0;

/// Convert a spreadsheet date serial (days since 1899-12-30) to a
/// calendar date. Returns None for serials outside the plausible
/// window.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !(SERIAL_MIN..=SERIAL_MAX).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(SERIAL_EPOCH.0, SERIAL_EPOCH.1, SERIAL_EPOCH.2)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Date formats accepted from text cells, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

fn parse_date_text(value: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    // a bare integer may still be a date serial exported as text
    value.parse::<f64>().ok().and_then(date_from_serial)
}

/// Render a numeric cell as text (IDs and phone numbers read from
/// Excel arrive as numbers; integers must not grow a ".0" suffix).
fn number_to_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// SchemaRowNormalizer
// ==========================================
pub struct SchemaRowNormalizer {
    /// Number of header rows preceding the data in the source file;
    /// row_index = position + header_rows + 1 so the index points at
    /// the actual file line.
    header_rows: usize,
}

impl SchemaRowNormalizer {
    pub fn new(header_rows: usize) -> Self {
        Self { header_rows }
    }

    fn lookup<'a>(&self, row: &'a RawRow, field: &FieldDescriptor) -> Option<&'a RawCell> {
        for alias in field.aliases.iter().chain(std::iter::once(&field.name)) {
            if let Some(cell) = row.cells.get(*alias) {
                if !cell.is_empty() {
                    return Some(cell);
                }
            }
        }
        None
    }

    fn coerce(&self, cell: &RawCell, kind: FieldKind) -> FieldValue {
        match kind {
            FieldKind::Text | FieldKind::Enum => match cell {
                RawCell::Text(s) => FieldValue::Text(s.trim().to_string()),
                RawCell::Number(n) => FieldValue::Text(number_to_text(*n)),
                RawCell::Date(d) => FieldValue::Text(d.format("%Y-%m-%d").to_string()),
                RawCell::Empty => FieldValue::Empty,
            },
            FieldKind::Number => match cell {
                RawCell::Number(n) => FieldValue::Number(*n),
                // non-numeric input resolves to the empty sentinel
                RawCell::Text(s) => match s.trim().parse::<f64>() {
                    Ok(n) => FieldValue::Number(n),
                    Err(_) => FieldValue::Empty,
                },
                RawCell::Date(_) | RawCell::Empty => FieldValue::Empty,
            },
            FieldKind::Date => match cell {
                RawCell::Date(d) => FieldValue::Date(*d),
                RawCell::Number(n) => match date_from_serial(*n) {
                    Some(d) => FieldValue::Date(d),
                    None => FieldValue::Invalid,
                },
                RawCell::Text(s) => match parse_date_text(s.trim()) {
                    Some(d) => FieldValue::Date(d),
                    None => FieldValue::Invalid,
                },
                RawCell::Empty => FieldValue::Empty,
            },
        }
    }
}

impl RowNormalizer for SchemaRowNormalizer {
    fn normalize(&self, row: &RawRow, schema: &EntitySchema) -> NormalizedRow {
        let mut normalized = NormalizedRow::new(row.position + self.header_rows + 1);

        for field in &schema.fields {
            let value = match self.lookup(row, field) {
                Some(cell) => self.coerce(cell, field.kind),
                None => FieldValue::Empty,
            };
            normalized.values.insert(field.name.to_string(), value);
        }

        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EntityType;
    use crate::schema::schema_for;

    fn normalize_one(row: RawRow, entity: EntityType) -> NormalizedRow {
        SchemaRowNormalizer::new(1).normalize(&row, schema_for(entity))
    }

    #[test]
    fn test_alias_lookup_localized_header() {
        let row = RawRow::new(0)
            .with_cell("Mã giảng viên", RawCell::Text("GV001".to_string()))
            .with_cell("Họ và tên", RawCell::Text("Nguyễn Văn An".to_string()));

        let normalized = normalize_one(row, EntityType::Lecturer);

        assert_eq!(normalized.field("lecturer_id").as_text(), Some("GV001"));
        assert_eq!(
            normalized.field("full_name").as_text(),
            Some("Nguyễn Văn An")
        );
    }

    #[test]
    fn test_alias_lookup_canonical_key() {
        let row = RawRow::new(0).with_cell("lecturer_id", RawCell::Text("GV002".to_string()));

        let normalized = normalize_one(row, EntityType::Lecturer);

        assert_eq!(normalized.field("lecturer_id").as_text(), Some("GV002"));
    }

    #[test]
    fn test_row_index_accounts_for_header() {
        let row = RawRow::new(0).with_cell("Mã phòng", RawCell::Text("P101".to_string()));
        let normalized = normalize_one(row, EntityType::Room);
        // first data row sits on file line 2
        assert_eq!(normalized.row_index, 2);
    }

    #[test]
    fn test_date_serial_coercion() {
        // 45658 = 2025-01-01
        let row = RawRow::new(0).with_cell("Ngày sinh", RawCell::Number(45658.0));

        let normalized = normalize_one(row, EntityType::Lecturer);

        assert_eq!(
            normalized.field("date_of_birth").as_date(),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
    }

    #[test]
    fn test_date_text_formats() {
        for (input, expected) in [
            ("2024-09-05", (2024, 9, 5)),
            ("05/09/2024", (2024, 9, 5)),
            ("2024/09/05", (2024, 9, 5)),
        ] {
            let row = RawRow::new(0).with_cell("Ngày sinh", RawCell::Text(input.to_string()));
            let normalized = normalize_one(row, EntityType::Lecturer);
            assert_eq!(
                normalized.field("date_of_birth").as_date(),
                NaiveDate::from_ymd_opt(expected.0, expected.1, expected.2),
                "format {} not accepted",
                input
            );
        }
    }

    #[test]
    fn test_unparseable_date_is_invalid_not_empty() {
        let row = RawRow::new(0).with_cell("Ngày sinh", RawCell::Text("mai mốt".to_string()));

        let normalized = normalize_one(row, EntityType::Lecturer);

        assert!(normalized.field("date_of_birth").is_invalid());
    }

    #[test]
    fn test_non_numeric_number_field_resolves_empty() {
        let row = RawRow::new(0).with_cell("Sức chứa", RawCell::Text("nhiều".to_string()));

        let normalized = normalize_one(row, EntityType::Room);

        assert!(normalized.field("capacity").is_empty());
    }

    #[test]
    fn test_numeric_cell_in_text_field_keeps_integer_shape() {
        let row = RawRow::new(0).with_cell("Số điện thoại", RawCell::Number(912345678.0));

        let normalized = normalize_one(row, EntityType::Lecturer);

        assert_eq!(normalized.field("phone").as_text(), Some("912345678"));
    }

    #[test]
    fn test_missing_column_resolves_empty() {
        let row = RawRow::new(0).with_cell("Mã phòng", RawCell::Text("P101".to_string()));

        let normalized = normalize_one(row, EntityType::Room);

        assert!(normalized.field("capacity").is_empty());
        assert!(normalized.field("name").is_empty());
    }
}
