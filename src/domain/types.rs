// ==========================================
// Academic Import System - Domain Types
// ==========================================
// Entity type catalogue + violation code vocabulary
// ==========================================

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ==========================================
// EntityType - the closed set of importable entities
// ==========================================
// Schemas are registered per entity type; there is no runtime
// mechanism for adding new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Lecturer,
    Student,
    Program,
    Semester,
    Subject,
    Class,
    ClassSection,
    Room,
}

impl EntityType {
    /// All entity types, in registry order.
    pub const ALL: [EntityType; 8] = [
        EntityType::Lecturer,
        EntityType::Student,
        EntityType::Program,
        EntityType::Semester,
        EntityType::Subject,
        EntityType::Class,
        EntityType::ClassSection,
        EntityType::Room,
    ];

    /// Store table holding records of this entity type.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityType::Lecturer => "lecturers",
            EntityType::Student => "students",
            EntityType::Program => "programs",
            EntityType::Semester => "semesters",
            EntityType::Subject => "subjects",
            EntityType::Class => "classes",
            EntityType::ClassSection => "class_sections",
            EntityType::Room => "rooms",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityType::Lecturer => "lecturer",
            EntityType::Student => "student",
            EntityType::Program => "program",
            EntityType::Semester => "semester",
            EntityType::Subject => "subject",
            EntityType::Class => "class",
            EntityType::ClassSection => "class_section",
            EntityType::Room => "room",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// ErrorCode - per-row data-quality violation codes
// ==========================================
// Codes are values, never Err: a row carrying any of these is
// excluded from commit but does not abort the run. The presentation
// layer maps each code to a localized label.
//
// Serialized as the snake_case wire string; `unknown_reference`
// carries the offending field name after a colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DuplicateId,
    MissingRequired,
    InvalidEmail,
    InvalidPhone,
    InvalidDate,
    InvalidGender,
    InvalidTrainingDuration,
    InvalidCredit,
    InvalidTheoryHours,
    InvalidPracticeHours,
    InvalidCapacity,
    InvalidDayOrPeriod,
    InvalidStartDate,
    InvalidEndDate,
    InvalidDateRange,
    UnknownReference(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::DuplicateId => write!(f, "duplicate_id"),
            ErrorCode::MissingRequired => write!(f, "missing_required"),
            ErrorCode::InvalidEmail => write!(f, "invalid_email"),
            ErrorCode::InvalidPhone => write!(f, "invalid_phone"),
            ErrorCode::InvalidDate => write!(f, "invalid_date"),
            ErrorCode::InvalidGender => write!(f, "invalid_gender"),
            ErrorCode::InvalidTrainingDuration => write!(f, "invalid_training_duration"),
            ErrorCode::InvalidCredit => write!(f, "invalid_credit"),
            ErrorCode::InvalidTheoryHours => write!(f, "invalid_theory_hours"),
            ErrorCode::InvalidPracticeHours => write!(f, "invalid_practice_hours"),
            ErrorCode::InvalidCapacity => write!(f, "invalid_capacity"),
            ErrorCode::InvalidDayOrPeriod => write!(f, "invalid_day_or_period"),
            ErrorCode::InvalidStartDate => write!(f, "invalid_start_date"),
            ErrorCode::InvalidEndDate => write!(f, "invalid_end_date"),
            ErrorCode::InvalidDateRange => write!(f, "invalid_date_range"),
            ErrorCode::UnknownReference(field) => write!(f, "unknown_reference:{}", field),
        }
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(field) = s.strip_prefix("unknown_reference:") {
            return Ok(ErrorCode::UnknownReference(field.to_string()));
        }
        match s {
            "duplicate_id" => Ok(ErrorCode::DuplicateId),
            "missing_required" => Ok(ErrorCode::MissingRequired),
            "invalid_email" => Ok(ErrorCode::InvalidEmail),
            "invalid_phone" => Ok(ErrorCode::InvalidPhone),
            "invalid_date" => Ok(ErrorCode::InvalidDate),
            "invalid_gender" => Ok(ErrorCode::InvalidGender),
            "invalid_training_duration" => Ok(ErrorCode::InvalidTrainingDuration),
            "invalid_credit" => Ok(ErrorCode::InvalidCredit),
            "invalid_theory_hours" => Ok(ErrorCode::InvalidTheoryHours),
            "invalid_practice_hours" => Ok(ErrorCode::InvalidPracticeHours),
            "invalid_capacity" => Ok(ErrorCode::InvalidCapacity),
            "invalid_day_or_period" => Ok(ErrorCode::InvalidDayOrPeriod),
            "invalid_start_date" => Ok(ErrorCode::InvalidStartDate),
            "invalid_end_date" => Ok(ErrorCode::InvalidEndDate),
            "invalid_date_range" => Ok(ErrorCode::InvalidDateRange),
            other => Err(format!("unknown error code: {}", other)),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ErrorCode::from_str(&s).map_err(de::Error::custom)
    }
}

// ==========================================
// CommitStatus - commit coordinator state
// ==========================================
// Idle -> Committing -> Committed(count) | Failed(reason)
// Failed keeps the validated working set; retry is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStatus {
    Idle,
    Committing,
    Committed(usize),
    Failed(String),
}

impl fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitStatus::Idle => write!(f, "idle"),
            CommitStatus::Committing => write!(f, "committing"),
            CommitStatus::Committed(n) => write!(f, "committed({})", n),
            CommitStatus::Failed(reason) => write!(f, "failed({})", reason),
        }
    }
}
