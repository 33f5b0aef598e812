// ==========================================
// Academic Import System - Schema Registry
// ==========================================
// One declarative schema per entity type: field descriptors with
// input aliases, the uniqueness key, format checks, cross-reference
// rules, and paired date-range rules. Each entity contributes data
// only; the validator engine interprets it.
// ==========================================

use crate::domain::types::{EntityType, ErrorCode};
use once_cell::sync::Lazy;
use std::collections::HashMap;

// ==========================================
// FieldKind - coercion target for a field
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Enum,
}

// ==========================================
// FieldCheck - declarative format check
// ==========================================
// Checks run only over non-empty fields; an empty required field is
// flagged as missing_required and must not additionally fail here.
#[derive(Debug, Clone)]
pub enum FieldCheck {
    /// Basic mailbox shape.
    Email,
    /// Local phone number: 0 or +84 prefix, then 9-10 digits.
    Phone,
    /// Date must not lie in the future (birth dates).
    PastDate,
    /// Membership in a fixed value set, case-insensitive.
    OneOf {
        allowed: &'static [&'static str],
        code: ErrorCode,
    },
    /// Strictly positive number.
    Positive(ErrorCode),
    /// Zero or positive number.
    NonNegative(ErrorCode),
}

// ==========================================
// FieldDescriptor
// ==========================================
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Canonical field name; also the payload key at commit time.
    pub name: &'static str,
    /// Accepted input column labels, first match wins. The canonical
    /// name itself is always accepted.
    pub aliases: &'static [&'static str],
    pub required: bool,
    pub kind: FieldKind,
    pub checks: Vec<FieldCheck>,
    /// Code reported when a non-empty cell fails kind coercion.
    /// Only date fields can end up in that state; number coercion
    /// failures resolve to the empty sentinel instead.
    pub coercion_code: ErrorCode,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            aliases: &[],
            required: false,
            kind,
            checks: Vec::new(),
            coercion_code: ErrorCode::InvalidDate,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn enumerated(name: &'static str) -> Self {
        Self::new(name, FieldKind::Enum)
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn check(mut self, check: FieldCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn coercion_code(mut self, code: ErrorCode) -> Self {
        self.coercion_code = code;
        self
    }
}

// ==========================================
// CrossRefRule - field must name an existing record
// ==========================================
// Violation yields unknown_reference:<field>. The key set comes from
// the caller (reference sets), usually the store's existing keys for
// the referenced entity type.
#[derive(Debug, Clone)]
pub struct CrossRefRule {
    pub field: &'static str,
    pub references: EntityType,
}

// ==========================================
// DateRangeRule - start strictly before end
// ==========================================
#[derive(Debug, Clone)]
pub struct DateRangeRule {
    pub start: &'static str,
    pub end: &'static str,
}

// ==========================================
// EntitySchema
// ==========================================
#[derive(Debug, Clone)]
pub struct EntitySchema {
    pub entity: EntityType,
    pub fields: Vec<FieldDescriptor>,
    /// The natural ID field; must be unique within a batch and
    /// against the existing store.
    pub unique_key: &'static str,
    pub cross_refs: Vec<CrossRefRule>,
    pub date_ranges: Vec<DateRangeRule>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Required field names, in schema order.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.required)
    }
}

// ==========================================
// Registry lookup
// ==========================================
static REGISTRY: Lazy<HashMap<EntityType, EntitySchema>> = Lazy::new(|| {
    EntityType::ALL
        .iter()
        .map(|&entity| (entity, crate::schema::entities::schema(entity)))
        .collect()
});

/// The schema for an entity type. Schemas are a closed, static set;
/// lookup cannot fail.
pub fn schema_for(entity: EntityType) -> &'static EntitySchema {
    REGISTRY
        .get(&entity)
        .unwrap_or_else(|| unreachable!("schema registered for every entity type"))
}
