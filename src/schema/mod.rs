// ==========================================
// Academic Import System - Schema Layer
// ==========================================
// Declarative per-entity rule tables interpreted by the validator
// engine. Adding an entity means adding a schema here, not a new
// validator function.
// ==========================================

pub mod entities;
pub mod registry;

pub use registry::{
    schema_for, CrossRefRule, DateRangeRule, EntitySchema, FieldCheck, FieldDescriptor, FieldKind,
};
