//! Per-entity normalization and required-field rules.

use crate::error::CoreError;
use crate::types::Record;

use super::coerce::{
    default_text, empty_to_null, float_field, int_field, require_email, require_text,
};

/// Default `min_quantity` when the grid sends something unparsable.
pub const DEFAULT_MIN_QUANTITY: i64 = 5;

/// Placeholder for lecture fields the backend requires but a new row may
/// not carry yet.
pub const UNSPECIFIED: &str = "미정";

const MATERIAL_OPTIONAL_FIELDS: &[&str] = &[
    "description",
    "publisher",
    "author",
    "isbn",
    "edition",
    "publication_date",
    "expiry_date",
];

const LECTURE_OPTIONAL_FIELDS: &[&str] = &["description", "location", "notes"];

const LECTURE_CREATE_DEFAULTS: &[&str] = &["subject", "grade", "schedule", "classroom"];

pub fn student(record: &mut Record) -> Result<(), CoreError> {
    float_field(record, "tuition_fee", 0.0);
    empty_to_null(record, &["tuition_due_date", "phone", "grade"]);

    require_email(record)?;
    require_text(record, "name", "이름은 필수입니다.")
}

pub fn teacher(record: &mut Record) -> Result<(), CoreError> {
    float_field(record, "hourly_rate", 0.0);
    empty_to_null(record, &["phone"]);

    require_email(record)?;
    require_text(record, "name", "이름은 필수입니다.")?;
    require_text(record, "subject", "담당 과목은 필수입니다.")
}

pub fn material(record: &mut Record) -> Result<(), CoreError> {
    float_field(record, "price", 0.0);
    int_field(record, "quantity", 0);
    int_field(record, "min_quantity", DEFAULT_MIN_QUANTITY);
    empty_to_null(record, MATERIAL_OPTIONAL_FIELDS);

    require_text(record, "name", "교재명은 필수입니다.")?;
    require_text(record, "subject", "과목은 필수입니다.")?;
    require_text(record, "grade", "학년은 필수입니다.")
}

pub fn lecture(record: &mut Record) -> Result<(), CoreError> {
    float_field(record, "price", 0.0);
    int_field(record, "duration", 0);
    empty_to_null(record, LECTURE_OPTIONAL_FIELDS);

    require_text(record, "title", "강의 제목은 필수입니다.")?;
    require_text(record, "subject", "과목은 필수입니다.")
}

/// Create-time defaults for lectures.
pub fn lecture_create_defaults(record: &mut Record) {
    for field in LECTURE_CREATE_DEFAULTS {
        default_text(record, field, UNSPECIFIED);
    }
}
