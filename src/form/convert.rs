use chrono::NaiveDate;

use crate::domain::{FieldPath, FieldValue, Gender, ValueKind};

use super::error::FieldCoercionError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Turns raw input text into the typed value stored at `path`.
pub(crate) fn coerce_input(path: FieldPath, raw: &str) -> Result<FieldValue, FieldCoercionError> {
    let Some(kind) = ValueKind::of_path(path) else {
        return Err(FieldCoercionError::new(
            path,
            "the hobbies list is edited through append/remove",
        ));
    };
    match kind {
        ValueKind::Text => Ok(FieldValue::Text(raw.to_string())),
        ValueKind::Integer => integer_value(raw, path).map(FieldValue::Integer),
        ValueKind::Gender => gender_value(raw, path).map(FieldValue::Gender),
        ValueKind::Date => date_value(raw, path).map(FieldValue::Date),
        ValueKind::Flag => flag_value(raw, path).map(FieldValue::Flag),
    }
}

pub(crate) fn integer_value(
    contents: &str,
    path: FieldPath,
) -> Result<Option<i64>, FieldCoercionError> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| FieldCoercionError::new(path, "expected integer"))
}

/// The empty selection and a missing value are the same unset state.
pub(crate) fn gender_value(
    contents: &str,
    path: FieldPath,
) -> Result<Option<Gender>, FieldCoercionError> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<Gender>()
        .map(Some)
        .map_err(|message| FieldCoercionError::new(path, message))
}

pub(crate) fn date_value(
    contents: &str,
    path: FieldPath,
) -> Result<Option<NaiveDate>, FieldCoercionError> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FieldCoercionError::new(path, format!("'{trimmed}' is not a valid date (YYYY-MM-DD)")))
}

fn flag_value(contents: &str, path: FieldPath) -> Result<bool, FieldCoercionError> {
    match contents.trim().to_ascii_lowercase().as_str() {
        "true" | "on" => Ok(true),
        "false" | "off" | "" => Ok(false),
        other => Err(FieldCoercionError::new(
            path,
            format!("'{other}' is not a valid boolean"),
        )),
    }
}
