use thiserror::Error;

use crate::domain::{FieldPath, StableId, ValueKind};

/// Raw input that could not be turned into the field's typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCoercionError {
    pub path: String,
    pub message: String,
}

impl FieldCoercionError {
    pub(crate) fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldCoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl std::error::Error for FieldCoercionError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{path} is out of range (list has {len} item(s))")]
    OutOfRange { path: FieldPath, len: usize },

    #[error("{0} does not hold a single value")]
    NotAValue(FieldPath),

    #[error("{path} expects {expected}, got {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: ValueKind,
        found: ValueKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("cannot remove {0}: at least one hobby must remain")]
    RemovalRejected(StableId),

    #[error("no hobby with id {0}")]
    UnknownItem(StableId),

    #[error("the hobbies list cannot be replaced with an empty list")]
    EmptyList,
}

/// Failure of a raw-input edit: either the text did not coerce or the path
/// does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error(transparent)]
    Coercion(#[from] FieldCoercionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
