// ==========================================
// Academic Import System - Entity Schemas
// ==========================================
// The eight importable entity types as declarative rule tables.
// Aliases cover the Vietnamese spreadsheet headers administrative
// staff actually upload, next to the canonical keys; the canonical
// name itself always matches as well.
// ==========================================

use crate::domain::types::{EntityType, ErrorCode};
use crate::schema::registry::{
    CrossRefRule, DateRangeRule, EntitySchema, FieldCheck, FieldDescriptor,
};

const GENDER_VALUES: &[&str] = &["Nam", "Nữ", "Khác"];

pub fn schema(entity: EntityType) -> EntitySchema {
    match entity {
        EntityType::Lecturer => lecturer(),
        EntityType::Student => student(),
        EntityType::Program => program(),
        EntityType::Semester => semester(),
        EntityType::Subject => subject(),
        EntityType::Class => class(),
        EntityType::ClassSection => class_section(),
        EntityType::Room => room(),
    }
}

fn lecturer() -> EntitySchema {
    EntitySchema {
        entity: EntityType::Lecturer,
        unique_key: "lecturer_id",
        fields: vec![
            FieldDescriptor::text("lecturer_id")
                .aliases(&["Mã giảng viên", "Mã GV"])
                .required(),
            FieldDescriptor::text("full_name")
                .aliases(&["Họ và tên", "Họ tên"])
                .required(),
            FieldDescriptor::text("email")
                .aliases(&["Email"])
                .required()
                .check(FieldCheck::Email),
            FieldDescriptor::text("phone")
                .aliases(&["Số điện thoại", "SĐT"])
                .check(FieldCheck::Phone),
            FieldDescriptor::enumerated("gender")
                .aliases(&["Giới tính"])
                .check(FieldCheck::OneOf {
                    allowed: GENDER_VALUES,
                    code: ErrorCode::InvalidGender,
                }),
            FieldDescriptor::date("date_of_birth")
                .aliases(&["Ngày sinh"])
                .check(FieldCheck::PastDate),
            FieldDescriptor::text("department").aliases(&["Khoa", "Đơn vị"]),
            FieldDescriptor::text("degree").aliases(&["Học vị"]),
        ],
        cross_refs: vec![],
        date_ranges: vec![],
    }
}

fn student() -> EntitySchema {
    EntitySchema {
        entity: EntityType::Student,
        unique_key: "student_id",
        fields: vec![
            FieldDescriptor::text("student_id")
                .aliases(&["Mã học viên", "Mã HV"])
                .required(),
            FieldDescriptor::text("full_name")
                .aliases(&["Họ và tên", "Họ tên"])
                .required(),
            FieldDescriptor::text("email")
                .aliases(&["Email"])
                .check(FieldCheck::Email),
            FieldDescriptor::text("phone")
                .aliases(&["Số điện thoại", "SĐT"])
                .check(FieldCheck::Phone),
            FieldDescriptor::enumerated("gender")
                .aliases(&["Giới tính"])
                .check(FieldCheck::OneOf {
                    allowed: GENDER_VALUES,
                    code: ErrorCode::InvalidGender,
                }),
            FieldDescriptor::date("date_of_birth")
                .aliases(&["Ngày sinh"])
                .check(FieldCheck::PastDate),
            FieldDescriptor::text("class_id")
                .aliases(&["Mã lớp", "Lớp"])
                .required(),
        ],
        cross_refs: vec![CrossRefRule {
            field: "class_id",
            references: EntityType::Class,
        }],
        date_ranges: vec![],
    }
}

fn program() -> EntitySchema {
    EntitySchema {
        entity: EntityType::Program,
        unique_key: "program_id",
        fields: vec![
            FieldDescriptor::text("program_id")
                .aliases(&["Mã chương trình", "Mã CTĐT"])
                .required(),
            FieldDescriptor::text("name")
                .aliases(&["Tên chương trình"])
                .required(),
            FieldDescriptor::number("training_duration")
                .aliases(&["Thời gian đào tạo (năm)", "Thời gian đào tạo"])
                .required()
                .check(FieldCheck::Positive(ErrorCode::InvalidTrainingDuration)),
            FieldDescriptor::text("degree_level").aliases(&["Trình độ đào tạo", "Trình độ"]),
        ],
        cross_refs: vec![],
        date_ranges: vec![],
    }
}

fn semester() -> EntitySchema {
    EntitySchema {
        entity: EntityType::Semester,
        unique_key: "semester_id",
        fields: vec![
            FieldDescriptor::text("semester_id")
                .aliases(&["Mã học kỳ", "Mã HK"])
                .required(),
            FieldDescriptor::text("name")
                .aliases(&["Tên học kỳ"])
                .required(),
            FieldDescriptor::text("academic_year").aliases(&["Năm học"]),
            FieldDescriptor::date("start_date")
                .aliases(&["Ngày bắt đầu"])
                .required()
                .coercion_code(ErrorCode::InvalidStartDate),
            FieldDescriptor::date("end_date")
                .aliases(&["Ngày kết thúc"])
                .required()
                .coercion_code(ErrorCode::InvalidEndDate),
        ],
        cross_refs: vec![],
        date_ranges: vec![DateRangeRule {
            start: "start_date",
            end: "end_date",
        }],
    }
}

fn subject() -> EntitySchema {
    EntitySchema {
        entity: EntityType::Subject,
        unique_key: "subject_id",
        fields: vec![
            FieldDescriptor::text("subject_id")
                .aliases(&["Mã môn học", "Mã MH"])
                .required(),
            FieldDescriptor::text("name")
                .aliases(&["Tên môn học"])
                .required(),
            FieldDescriptor::number("credit")
                .aliases(&["Số tín chỉ", "Tín chỉ"])
                .required()
                .check(FieldCheck::Positive(ErrorCode::InvalidCredit)),
            FieldDescriptor::number("theory_hours")
                .aliases(&["Số tiết lý thuyết", "Tiết lý thuyết"])
                .check(FieldCheck::NonNegative(ErrorCode::InvalidTheoryHours)),
            FieldDescriptor::number("practice_hours")
                .aliases(&["Số tiết thực hành", "Tiết thực hành"])
                .check(FieldCheck::NonNegative(ErrorCode::InvalidPracticeHours)),
            FieldDescriptor::text("semester_id")
                .aliases(&["Mã học kỳ", "Học kỳ"])
                .required(),
            FieldDescriptor::text("program_id").aliases(&["Mã chương trình"]),
        ],
        cross_refs: vec![
            CrossRefRule {
                field: "semester_id",
                references: EntityType::Semester,
            },
            CrossRefRule {
                field: "program_id",
                references: EntityType::Program,
            },
        ],
        date_ranges: vec![],
    }
}

fn class() -> EntitySchema {
    EntitySchema {
        entity: EntityType::Class,
        unique_key: "class_id",
        fields: vec![
            FieldDescriptor::text("class_id")
                .aliases(&["Mã lớp"])
                .required(),
            FieldDescriptor::text("name")
                .aliases(&["Tên lớp"])
                .required(),
            FieldDescriptor::text("program_id")
                .aliases(&["Mã chương trình", "Chương trình"])
                .required(),
            // homeroom lecturer, optional
            FieldDescriptor::text("lecturer_id").aliases(&["Mã giảng viên", "GVCN"]),
        ],
        cross_refs: vec![
            CrossRefRule {
                field: "program_id",
                references: EntityType::Program,
            },
            CrossRefRule {
                field: "lecturer_id",
                references: EntityType::Lecturer,
            },
        ],
        date_ranges: vec![],
    }
}

fn class_section() -> EntitySchema {
    EntitySchema {
        entity: EntityType::ClassSection,
        unique_key: "section_id",
        fields: vec![
            FieldDescriptor::text("section_id")
                .aliases(&["Mã lớp học phần", "Mã LHP"])
                .required(),
            FieldDescriptor::text("subject_id")
                .aliases(&["Mã môn học"])
                .required(),
            FieldDescriptor::text("lecturer_id")
                .aliases(&["Mã giảng viên", "Giảng viên"])
                .required(),
            FieldDescriptor::text("semester_id")
                .aliases(&["Mã học kỳ"])
                .required(),
            FieldDescriptor::text("room_id").aliases(&["Mã phòng", "Phòng học"]),
            FieldDescriptor::number("day_of_week")
                .aliases(&["Thứ"])
                .check(FieldCheck::NonNegative(ErrorCode::InvalidDayOrPeriod)),
            FieldDescriptor::number("start_period")
                .aliases(&["Tiết bắt đầu"])
                .check(FieldCheck::NonNegative(ErrorCode::InvalidDayOrPeriod)),
            FieldDescriptor::number("period_count")
                .aliases(&["Số tiết"])
                .check(FieldCheck::NonNegative(ErrorCode::InvalidDayOrPeriod)),
        ],
        cross_refs: vec![
            CrossRefRule {
                field: "subject_id",
                references: EntityType::Subject,
            },
            CrossRefRule {
                field: "lecturer_id",
                references: EntityType::Lecturer,
            },
            CrossRefRule {
                field: "semester_id",
                references: EntityType::Semester,
            },
            CrossRefRule {
                field: "room_id",
                references: EntityType::Room,
            },
        ],
        date_ranges: vec![],
    }
}

fn room() -> EntitySchema {
    EntitySchema {
        entity: EntityType::Room,
        unique_key: "room_id",
        fields: vec![
            FieldDescriptor::text("room_id")
                .aliases(&["Mã phòng"])
                .required(),
            FieldDescriptor::text("name")
                .aliases(&["Tên phòng"])
                .required(),
            FieldDescriptor::text("building").aliases(&["Tòa nhà", "Khu nhà"]),
            FieldDescriptor::number("capacity")
                .aliases(&["Sức chứa"])
                .required()
                .check(FieldCheck::Positive(ErrorCode::InvalidCapacity)),
            FieldDescriptor::text("room_type").aliases(&["Loại phòng"]),
        ],
        cross_refs: vec![],
        date_ranges: vec![],
    }
}
