use std::sync::LazyLock;

use tracing::debug;

use crate::{
    domain::{FieldPath, FormSchema, Record, Target},
    form::ErrorMap,
};

static SIGNUP_SCHEMA: LazyLock<FormSchema> = LazyLock::new(FormSchema::signup);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid { issues: usize },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// Checks `record` against the sign-up schema.
pub fn validate(record: &Record) -> ErrorMap {
    validate_with(&SIGNUP_SCHEMA, record)
}

/// Evaluates every rule of `schema` against `record`. Pure: the same record
/// always yields the same map, and nothing else is touched.
pub fn validate_with(schema: &FormSchema, record: &Record) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for rule in schema.rules() {
        if !rule.is_active(record) {
            continue;
        }
        match rule.target {
            Target::Field(FieldPath::Hobbies) => {
                if !rule.check.accepts_len(record.hobbies.len()) {
                    errors.report(FieldPath::Hobbies, &rule.message);
                }
            }
            Target::Field(path) => {
                if let Some(value) = record.value(path)
                    && !rule.check.accepts(&value)
                {
                    errors.report(path, &rule.message);
                }
            }
            Target::EachHobbyName => {
                for index in 0..record.hobbies.len() {
                    let path = FieldPath::HobbyName(index);
                    if let Some(value) = record.value(path)
                        && !rule.check.accepts(&value)
                    {
                        errors.report(path, &rule.message);
                    }
                }
            }
        }
    }
    errors
}

/// Runs a full pass and replaces `errors` with the result.
pub(crate) fn validate_into(
    schema: &FormSchema,
    record: &Record,
    errors: &mut ErrorMap,
) -> ValidationOutcome {
    *errors = validate_with(schema, record);
    debug!(issues = errors.len(), "validation pass finished");
    if errors.is_empty() {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid {
            issues: errors.len(),
        }
    }
}
