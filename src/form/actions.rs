use thiserror::Error;

use crate::domain::{FieldPath, FieldValue, StableId};

use super::error::{InputError, ListError, StoreError};

/// Edits a rendering layer can send to the engine.
#[derive(Debug, Clone)]
pub enum FormCommand {
    /// Raw text from an input element.
    Input { path: FieldPath, raw: String },
    /// An already typed value, e.g. from a date picker.
    Set { path: FieldPath, value: FieldValue },
    AppendHobby { name: String },
    RemoveHobby(StableId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Edits wait until the submission in flight has settled.
    #[error("the form cannot be edited while a submission is in progress")]
    Busy,

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    List(#[from] ListError),
}
