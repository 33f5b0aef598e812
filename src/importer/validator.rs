// ==========================================
// Academic Import System - Validator Engine
// ==========================================
// Stage 2: ordered violation codes per row, driven entirely by the
// entity schema. Check order is fixed so reporting is deterministic:
//   1. duplicate against store snapshot
//   2. duplicate within batch (every occurrence is flagged)
//   3. missing required fields
//   4. per-field format checks + paired date ranges (non-empty only)
//   5. cross-reference checks
// The violation list is kept in full for every entity; nothing is
// truncated or deduplicated.
// ==========================================

use crate::domain::row::{FieldValue, NormalizedRow, ValidatedRow};
use crate::domain::types::ErrorCode;
use crate::importer::traits::{ExistingKeys, ReferenceSets, ValidatorEngine};
use crate::schema::{EntitySchema, FieldCheck, FieldDescriptor};
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

// 0 or +84 prefix, then 9-10 digits
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+84|0)\d{9,10}$").expect("phone pattern"));

// ==========================================
// SchemaValidator
// ==========================================
pub struct SchemaValidator {
    /// Reference date for temporal-sanity checks (birth dates must
    /// not lie beyond it). Injectable for tests.
    today: NaiveDate,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }

    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Uniqueness-key occurrence counts for the whole batch, built
    /// once per run (a key -> rows index map instead of nested scans).
    fn batch_key_counts(schema: &EntitySchema, rows: &[NormalizedRow]) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in rows {
            if let Some(key) = row.key_value(schema.unique_key) {
                *counts.entry(key.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    fn check_field(
        &self,
        field: &FieldDescriptor,
        value: &FieldValue,
        errors: &mut Vec<ErrorCode>,
    ) {
        // a value that failed kind coercion gets the field's own
        // invalid code; an empty required field was already flagged
        // as missing_required and is not re-flagged here
        if value.is_invalid() {
            errors.push(field.coercion_code.clone());
            return;
        }
        if value.is_empty() {
            return;
        }

        for check in &field.checks {
            match check {
                FieldCheck::Email => {
                    if let Some(text) = value.as_text() {
                        if !EMAIL_RE.is_match(text) {
                            errors.push(ErrorCode::InvalidEmail);
                        }
                    }
                }
                FieldCheck::Phone => {
                    if let Some(text) = value.as_text() {
                        let compact: String =
                            text.chars().filter(|c| !matches!(c, ' ' | '.' | '-')).collect();
                        if !PHONE_RE.is_match(&compact) {
                            errors.push(ErrorCode::InvalidPhone);
                        }
                    }
                }
                FieldCheck::PastDate => {
                    if let Some(date) = value.as_date() {
                        if date > self.today {
                            errors.push(field.coercion_code.clone());
                        }
                    }
                }
                FieldCheck::OneOf { allowed, code } => {
                    if let Some(text) = value.as_text() {
                        let known = allowed
                            .iter()
                            .any(|candidate| candidate.eq_ignore_ascii_case(text));
                        if !known {
                            errors.push(code.clone());
                        }
                    }
                }
                FieldCheck::Positive(code) => {
                    if let Some(n) = value.as_number() {
                        if n <= 0.0 {
                            errors.push(code.clone());
                        }
                    }
                }
                FieldCheck::NonNegative(code) => {
                    if let Some(n) = value.as_number() {
                        if n < 0.0 {
                            errors.push(code.clone());
                        }
                    }
                }
            }
        }
    }

    fn validate_row(
        &self,
        schema: &EntitySchema,
        row: &NormalizedRow,
        key_counts: &HashMap<String, usize>,
        existing: &ExistingKeys,
        references: &ReferenceSets,
    ) -> Vec<ErrorCode> {
        let mut errors = Vec::new();

        // 1. duplicate against the existing store
        // 2. duplicate within the batch: when a key is ambiguous,
        //    every row sharing it is rejected (there is no rule for
        //    picking a winner)
        if let Some(key) = row.key_value(schema.unique_key) {
            if existing.contains(key) {
                errors.push(ErrorCode::DuplicateId);
            }
            if key_counts.get(key).copied().unwrap_or(0) > 1 {
                errors.push(ErrorCode::DuplicateId);
            }
        }

        // 3. required fields; does not short-circuit the rest
        for field in schema.required_fields() {
            if row.field(field.name).is_empty() {
                errors.push(ErrorCode::MissingRequired);
            }
        }

        // 4. per-field format checks (non-empty fields only)
        for field in &schema.fields {
            self.check_field(field, row.field(field.name), &mut errors);
        }

        // 4b. paired constraints: start strictly before end
        for rule in &schema.date_ranges {
            if let (Some(start), Some(end)) = (
                row.field(rule.start).as_date(),
                row.field(rule.end).as_date(),
            ) {
                if start >= end {
                    errors.push(ErrorCode::InvalidDateRange);
                }
            }
        }

        // 5. cross-reference checks; a reference set the caller did
        //    not supply cannot be checked and is skipped
        for rule in &schema.cross_refs {
            if let Some(value) = row.field(rule.field).as_text() {
                if let Some(known) = references.get(rule.field) {
                    if !known.contains(value) {
                        errors.push(ErrorCode::UnknownReference(rule.field.to_string()));
                    }
                }
            }
        }

        errors
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorEngine for SchemaValidator {
    fn validate_batch(
        &self,
        schema: &EntitySchema,
        rows: Vec<NormalizedRow>,
        existing: &ExistingKeys,
        references: &ReferenceSets,
    ) -> Vec<ValidatedRow> {
        let key_counts = Self::batch_key_counts(schema, &rows);

        rows.into_iter()
            .map(|row| {
                let errors = self.validate_row(schema, &row, &key_counts, existing, references);
                ValidatedRow { row, errors }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EntityType;
    use crate::schema::schema_for;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::with_today(today())
    }

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    fn lecturer_row(index: usize, id: &str) -> NormalizedRow {
        let mut row = NormalizedRow::new(index);
        row.values.insert("lecturer_id".to_string(), text(id));
        row.values
            .insert("full_name".to_string(), text("Nguyễn Văn An"));
        row.values
            .insert("email".to_string(), text("an.nv@uni.edu.vn"));
        row
    }

    fn no_refs() -> ReferenceSets {
        ReferenceSets::new()
    }

    #[test]
    fn test_store_duplicate_regardless_of_other_fields() {
        let schema = schema_for(EntityType::Lecturer);
        let existing: ExistingKeys = HashSet::from(["GV001".to_string()]);

        let rows = vec![lecturer_row(2, "GV001")];
        let validated = validator().validate_batch(schema, rows, &existing, &no_refs());

        assert_eq!(validated[0].errors, vec![ErrorCode::DuplicateId]);
    }

    #[test]
    fn test_batch_duplicate_flags_every_occurrence() {
        let schema = schema_for(EntityType::Student);
        let mut first = NormalizedRow::new(2);
        first
            .values
            .insert("student_id".to_string(), text("HV2025001"));
        first.values.insert("full_name".to_string(), text("A"));
        first.values.insert("class_id".to_string(), text("L01"));
        let mut second = first.clone();
        second.row_index = 3;
        let mut third = NormalizedRow::new(4);
        third
            .values
            .insert("student_id".to_string(), text("HV2025002"));
        third.values.insert("full_name".to_string(), text("B"));
        third.values.insert("class_id".to_string(), text("L01"));

        let validated = validator().validate_batch(
            schema,
            vec![first, second, third],
            &ExistingKeys::new(),
            &no_refs(),
        );

        assert!(validated[0].errors.contains(&ErrorCode::DuplicateId));
        assert!(validated[1].errors.contains(&ErrorCode::DuplicateId));
        assert!(validated[2].is_valid());
    }

    #[test]
    fn test_missing_required_without_format_double_fire() {
        let schema = schema_for(EntityType::Lecturer);
        let mut row = NormalizedRow::new(2);
        row.values
            .insert("lecturer_id".to_string(), text("GV010"));
        row.values.insert("full_name".to_string(), text("C"));
        // required email left empty: missing_required, not invalid_email
        row.values.insert("email".to_string(), FieldValue::Empty);

        let validated =
            validator().validate_batch(schema, vec![row], &ExistingKeys::new(), &no_refs());

        assert_eq!(validated[0].errors, vec![ErrorCode::MissingRequired]);
    }

    #[test]
    fn test_unparseable_required_date_reports_coercion_code_once() {
        let schema = schema_for(EntityType::Semester);
        let mut row = NormalizedRow::new(2);
        row.values
            .insert("semester_id".to_string(), text("HK01"));
        row.values.insert("name".to_string(), text("Học kỳ 1"));
        row.values
            .insert("start_date".to_string(), FieldValue::Invalid);
        row.values.insert(
            "end_date".to_string(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()),
        );

        let validated =
            validator().validate_batch(schema, vec![row], &ExistingKeys::new(), &no_refs());

        // present-but-bad is not absent: no missing_required for it
        assert_eq!(validated[0].errors, vec![ErrorCode::InvalidStartDate]);
    }

    #[test]
    fn test_check_order_is_deterministic() {
        let schema = schema_for(EntityType::Lecturer);
        let existing: ExistingKeys = HashSet::from(["GV001".to_string()]);
        let mut row = NormalizedRow::new(2);
        row.values
            .insert("lecturer_id".to_string(), text("GV001"));
        // full_name missing, email malformed
        row.values.insert("email".to_string(), text("not-an-email"));

        let validated = validator().validate_batch(schema, vec![row], &existing, &no_refs());

        assert_eq!(
            validated[0].errors,
            vec![
                ErrorCode::DuplicateId,
                ErrorCode::MissingRequired,
                ErrorCode::InvalidEmail,
            ]
        );
    }

    #[test]
    fn test_phone_format() {
        let schema = schema_for(EntityType::Lecturer);
        for (input, ok) in [
            ("0912345678", true),
            ("+84912345678", true),
            ("091 234 5678", true),
            ("12345", false),
            ("09abc45678", false),
        ] {
            let mut row = lecturer_row(2, "GV020");
            row.values.insert("phone".to_string(), text(input));
            let validated = validator().validate_batch(
                schema,
                vec![row],
                &ExistingKeys::new(),
                &no_refs(),
            );
            assert_eq!(
                !validated[0].errors.contains(&ErrorCode::InvalidPhone),
                ok,
                "phone {:?}",
                input
            );
        }
    }

    #[test]
    fn test_gender_membership_case_insensitive() {
        let schema = schema_for(EntityType::Lecturer);
        let mut valid = lecturer_row(2, "GV030");
        valid.values.insert("gender".to_string(), text("nam"));
        let mut invalid = lecturer_row(3, "GV031");
        invalid.values.insert("gender".to_string(), text("other"));

        let validated = validator().validate_batch(
            schema,
            vec![valid, invalid],
            &ExistingKeys::new(),
            &no_refs(),
        );

        assert!(validated[0].is_valid());
        assert_eq!(validated[1].errors, vec![ErrorCode::InvalidGender]);
    }

    #[test]
    fn test_birth_date_in_future() {
        let schema = schema_for(EntityType::Lecturer);
        let mut row = lecturer_row(2, "GV040");
        row.values.insert(
            "date_of_birth".to_string(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
        );

        let validated =
            validator().validate_batch(schema, vec![row], &ExistingKeys::new(), &no_refs());

        assert_eq!(validated[0].errors, vec![ErrorCode::InvalidDate]);
    }

    #[test]
    fn test_room_capacity_positivity() {
        let schema = schema_for(EntityType::Room);
        let mut row = NormalizedRow::new(2);
        row.values.insert("room_id".to_string(), text("P101"));
        row.values.insert("name".to_string(), text("Phòng 101"));
        row.values
            .insert("capacity".to_string(), FieldValue::Number(-5.0));

        let validated =
            validator().validate_batch(schema, vec![row], &ExistingKeys::new(), &no_refs());

        assert_eq!(validated[0].errors, vec![ErrorCode::InvalidCapacity]);
    }

    #[test]
    fn test_subject_hour_counts_non_negative() {
        let schema = schema_for(EntityType::Subject);
        let mut row = NormalizedRow::new(2);
        row.values.insert("subject_id".to_string(), text("MH01"));
        row.values.insert("name".to_string(), text("Toán rời rạc"));
        row.values
            .insert("credit".to_string(), FieldValue::Number(0.0));
        row.values
            .insert("theory_hours".to_string(), FieldValue::Number(-1.0));
        row.values
            .insert("practice_hours".to_string(), FieldValue::Number(0.0));
        row.values.insert("semester_id".to_string(), text("HK01"));

        let validated =
            validator().validate_batch(schema, vec![row], &ExistingKeys::new(), &no_refs());

        assert_eq!(
            validated[0].errors,
            vec![ErrorCode::InvalidCredit, ErrorCode::InvalidTheoryHours]
        );
    }

    #[test]
    fn test_date_range_strictly_before() {
        let schema = schema_for(EntityType::Semester);
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut row = NormalizedRow::new(2);
        row.values.insert("semester_id".to_string(), text("HK02"));
        row.values.insert("name".to_string(), text("Học kỳ 2"));
        row.values
            .insert("start_date".to_string(), FieldValue::Date(date));
        row.values
            .insert("end_date".to_string(), FieldValue::Date(date));

        let validated =
            validator().validate_batch(schema, vec![row], &ExistingKeys::new(), &no_refs());

        assert_eq!(validated[0].errors, vec![ErrorCode::InvalidDateRange]);
    }

    #[test]
    fn test_unknown_reference() {
        let schema = schema_for(EntityType::Subject);
        let mut references = ReferenceSets::new();
        references.insert("semester_id", HashSet::from(["HK01".to_string()]));

        let mut known = NormalizedRow::new(2);
        known.values.insert("subject_id".to_string(), text("MH01"));
        known.values.insert("name".to_string(), text("Giải tích"));
        known
            .values
            .insert("credit".to_string(), FieldValue::Number(3.0));
        known.values.insert("semester_id".to_string(), text("HK01"));
        let mut unknown = known.clone();
        unknown.row_index = 3;
        unknown
            .values
            .insert("subject_id".to_string(), text("MH02"));
        unknown
            .values
            .insert("semester_id".to_string(), text("HK99"));

        let validated = validator().validate_batch(
            schema,
            vec![known, unknown],
            &ExistingKeys::new(),
            &references,
        );

        assert!(validated[0].is_valid());
        assert_eq!(
            validated[1].errors,
            vec![ErrorCode::UnknownReference("semester_id".to_string())]
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let schema = schema_for(EntityType::Lecturer);
        let existing: ExistingKeys = HashSet::from(["GV001".to_string()]);
        let rows = vec![lecturer_row(2, "GV001"), lecturer_row(3, "GV002")];

        let first = validator().validate_batch(schema, rows.clone(), &existing, &no_refs());
        let second = validator().validate_batch(schema, rows, &existing, &no_refs());

        assert_eq!(first, second);
    }
}
