//! Turns raw JSON request bodies into typed calculation requests.
//!
//! Validation never stops at the first problem: every field of every list
//! element is checked and all failures are returned together, keyed by field
//! name and list index. A record's cross-field rule only runs once both of its
//! fields passed on their own.

use crate::domain::model::{
    CgpaRequest, RequiredSgpaRequest, SemesterRecord, HEAVY_LOAD_CREDITS, LOW_SGPA_THRESHOLD,
    MAX_SGPA, MIN_SGPA,
};
use crate::utils::error::{ErrorKind, FieldPath, ValidationErrors, NON_FIELD_ERRORS};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Integer strings, optionally followed by a zero fraction ("20", "20.0", "20.").
static WHOLE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)(?:\.0*)?\s*$").expect("static pattern"));

pub const SEMESTERS: &str = "semesters";
pub const COMPLETED_SEMESTERS: &str = "completed_semesters";
pub const TOTAL_PROGRAM_CREDITS: &str = "total_program_credits";
pub const FUTURE_SEMESTER_CREDITS: &str = "future_semester_credits";
pub const EXPECTED_CGPA: &str = "expected_cgpa";

const REQUIRED_MESSAGE: &str = "This field is required.";
const NULL_MESSAGE: &str = "This field may not be null.";
const EMPTY_LIST_MESSAGE: &str = "This list may not be empty.";
const SGPA_RANGE_MESSAGE: &str = "SGPA must be between 0 and 10.";
const CREDITS_RANGE_MESSAGE: &str = "Credits must be a positive integer.";
const INCONSISTENT_RECORD_MESSAGE: &str = "Low SGPA with high credits seems invalid.";
const FUTURE_CREDITS_MESSAGE: &str = "Future semester credits must be greater than zero.";

struct Messages {
    required: &'static str,
    invalid: &'static str,
}

const SGPA: Messages = Messages {
    required: "SGPA is required.",
    invalid: "SGPA must be a number.",
};

const CREDITS: Messages = Messages {
    required: "Credits are required.",
    invalid: "Credits must be an integer.",
};

const FLOAT: Messages = Messages {
    required: REQUIRED_MESSAGE,
    invalid: "A valid number is required.",
};

const INTEGER: Messages = Messages {
    required: REQUIRED_MESSAGE,
    invalid: "A valid integer is required.",
};

/// Validates a `{"semesters": [...]}` body.
pub fn validate_cgpa_request(input: &Value) -> Result<CgpaRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let root = FieldPath::root();

    let Some(object) = expect_object(input, &root, &mut errors) else {
        return Err(errors);
    };

    let path = root.field(SEMESTERS);
    let mut semesters = Vec::new();
    if let Some(items) = list_field(
        object,
        SEMESTERS,
        &path,
        "The 'semesters' field is required.",
        &mut errors,
    ) {
        if items.is_empty() {
            errors.add(path.clone(), ErrorKind::EmptyInput, EMPTY_LIST_MESSAGE);
        }
        semesters = semester_list(items, &path, &mut errors);
    }

    errors.into_result(CgpaRequest::new_unchecked(semesters))
}

/// Validates a required-SGPA body. `completed_semesters` may be empty.
pub fn validate_required_sgpa_request(
    input: &Value,
) -> Result<RequiredSgpaRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let root = FieldPath::root();

    let Some(object) = expect_object(input, &root, &mut errors) else {
        return Err(errors);
    };

    let completed_path = root.field(COMPLETED_SEMESTERS);
    let completed = list_field(
        object,
        COMPLETED_SEMESTERS,
        &completed_path,
        REQUIRED_MESSAGE,
        &mut errors,
    )
    .map(|items| semester_list(items, &completed_path, &mut errors))
    .unwrap_or_default();

    let total_program_credits =
        integer_field(object, TOTAL_PROGRAM_CREDITS, &root, &INTEGER, &mut errors);

    let future_semester_credits =
        integer_field(object, FUTURE_SEMESTER_CREDITS, &root, &INTEGER, &mut errors);
    if let Some(credits) = future_semester_credits {
        if credits <= 0 {
            errors.add(
                root.field(FUTURE_SEMESTER_CREDITS),
                ErrorKind::Range,
                FUTURE_CREDITS_MESSAGE,
            );
        }
    }

    let expected_cgpa = float_field(object, EXPECTED_CGPA, &root, &FLOAT, &mut errors);

    match (total_program_credits, future_semester_credits, expected_cgpa) {
        (Some(total_program_credits), Some(future_semester_credits), Some(expected_cgpa))
            if errors.is_empty() =>
        {
            Ok(RequiredSgpaRequest {
                completed,
                total_program_credits,
                future_semester_credits,
                expected_cgpa,
            })
        }
        _ => Err(errors),
    }
}

/// Validates a single `{"sgpa": .., "credits": ..}` object.
pub fn validate_semester(input: &Value) -> Result<SemesterRecord, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    match semester_at(input, &FieldPath::root(), &mut errors) {
        Some(record) if errors.is_empty() => Ok(record),
        _ => Err(errors),
    }
}

impl SemesterRecord {
    /// Builds a record from already-typed values, applying the same range and
    /// consistency rules as request validation.
    pub fn try_new(sgpa: f64, credits: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let root = FieldPath::root();
        let sgpa = check_sgpa(sgpa, &root.field("sgpa"), &mut errors);
        let credits = check_credits(credits, &root.field("credits"), &mut errors);
        match (sgpa, credits) {
            (Some(sgpa), Some(credits)) => check_consistency(sgpa, credits, &root, &mut errors)
                .ok_or(errors),
            _ => Err(errors),
        }
    }
}

fn semester_list(
    items: &[Value],
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Vec<SemesterRecord> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| semester_at(item, &path.index(index), errors))
        .collect()
}

fn semester_at(
    value: &Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<SemesterRecord> {
    let object = expect_object(value, path, errors)?;

    let sgpa = float_field(object, "sgpa", path, &SGPA, errors)
        .and_then(|sgpa| check_sgpa(sgpa, &path.field("sgpa"), errors));
    let credits = integer_field(object, "credits", path, &CREDITS, errors)
        .and_then(|credits| check_credits(credits, &path.field("credits"), errors));

    check_consistency(sgpa?, credits?, path, errors)
}

fn check_sgpa(sgpa: f64, path: &FieldPath, errors: &mut ValidationErrors) -> Option<f64> {
    if (MIN_SGPA..=MAX_SGPA).contains(&sgpa) {
        Some(sgpa)
    } else {
        errors.add(path.clone(), ErrorKind::Range, SGPA_RANGE_MESSAGE);
        None
    }
}

fn check_credits(credits: i64, path: &FieldPath, errors: &mut ValidationErrors) -> Option<u32> {
    if credits <= 0 {
        errors.add(path.clone(), ErrorKind::Range, CREDITS_RANGE_MESSAGE);
        return None;
    }
    match u32::try_from(credits) {
        Ok(credits) => Some(credits),
        Err(_) => {
            errors.add(
                path.clone(),
                ErrorKind::Range,
                format!("Ensure this value is less than or equal to {}.", u32::MAX),
            );
            None
        }
    }
}

fn check_consistency(
    sgpa: f64,
    credits: u32,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<SemesterRecord> {
    if sgpa < LOW_SGPA_THRESHOLD && credits > HEAVY_LOAD_CREDITS {
        errors.add(
            path.field(NON_FIELD_ERRORS),
            ErrorKind::Inconsistency,
            INCONSISTENT_RECORD_MESSAGE,
        );
        return None;
    }
    Some(SemesterRecord::new_unchecked(sgpa, credits))
}

fn expect_object<'a>(
    value: &'a Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(object) => Some(object),
        other => {
            errors.add(
                path.field(NON_FIELD_ERRORS),
                ErrorKind::InvalidFormat,
                format!(
                    "Invalid data. Expected an object, but got {}.",
                    json_type_name(other)
                ),
            );
            None
        }
    }
}

/// Looks up `name`, recording a `Missing` or null error when there is no usable value.
fn present<'a>(
    object: &'a Map<String, Value>,
    name: &str,
    path: &FieldPath,
    required_message: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Value> {
    match object.get(name) {
        None => {
            errors.add(path.clone(), ErrorKind::Missing, required_message);
            None
        }
        Some(Value::Null) => {
            errors.add(path.clone(), ErrorKind::InvalidFormat, NULL_MESSAGE);
            None
        }
        Some(value) => Some(value),
    }
}

fn list_field<'a>(
    object: &'a Map<String, Value>,
    name: &str,
    path: &FieldPath,
    required_message: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Vec<Value>> {
    match present(object, name, path, required_message, errors)? {
        Value::Array(items) => Some(items),
        other => {
            errors.add(
                path.clone(),
                ErrorKind::InvalidFormat,
                format!(
                    "Expected a list of items but got type \"{}\".",
                    json_type_name(other)
                ),
            );
            None
        }
    }
}

fn float_field(
    object: &Map<String, Value>,
    name: &str,
    parent: &FieldPath,
    messages: &Messages,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let path = parent.field(name);
    let value = present(object, name, &path, messages.required, errors)?;
    let parsed = coerce_float(value);
    if parsed.is_none() {
        errors.add(path, ErrorKind::InvalidFormat, messages.invalid);
    }
    parsed
}

fn integer_field(
    object: &Map<String, Value>,
    name: &str,
    parent: &FieldPath,
    messages: &Messages,
    errors: &mut ValidationErrors,
) -> Option<i64> {
    let path = parent.field(name);
    let value = present(object, name, &path, messages.required, errors)?;
    let parsed = coerce_integer(value);
    if parsed.is_none() {
        errors.add(path, ErrorKind::InvalidFormat, messages.invalid);
    }
    parsed
}

/// Numbers and numeric strings; NaN and infinities are rejected.
pub(crate) fn coerce_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Integers, whole-valued floats and integer strings.
pub(crate) fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => WHOLE_NUMBER
            .captures(s)
            .and_then(|caps| caps[1].parse::<i64>().ok()),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
