use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::{FieldPath, Gender, Record};

/// A single typed value addressed by a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(Option<i64>),
    Gender(Option<Gender>),
    Date(Option<NaiveDate>),
    Flag(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Gender,
    Date,
    Flag,
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Integer(_) => ValueKind::Integer,
            FieldValue::Gender(_) => ValueKind::Gender,
            FieldValue::Date(_) => ValueKind::Date,
            FieldValue::Flag(_) => ValueKind::Flag,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

impl ValueKind {
    /// Kind stored at `path`; `None` for the hobbies sequence itself.
    pub fn of_path(path: FieldPath) -> Option<Self> {
        let kind = match path {
            FieldPath::FirstName
            | FieldPath::LastName
            | FieldPath::Email
            | FieldPath::AddressCity
            | FieldPath::AddressState
            | FieldPath::HobbyName(_)
            | FieldPath::Referral => ValueKind::Text,
            FieldPath::Age => ValueKind::Integer,
            FieldPath::Gender => ValueKind::Gender,
            FieldPath::StartDate => ValueKind::Date,
            FieldPath::Subscribe => ValueKind::Flag,
            FieldPath::Hobbies => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Gender => "gender",
            ValueKind::Date => "date",
            ValueKind::Flag => "boolean",
        };
        f.write_str(label)
    }
}

impl Record {
    /// Reads the value at `path`. `None` when the path addresses the hobbies
    /// sequence or a row that does not exist.
    pub fn value(&self, path: FieldPath) -> Option<FieldValue> {
        let value = match path {
            FieldPath::FirstName => FieldValue::Text(self.first_name.clone()),
            FieldPath::LastName => FieldValue::Text(self.last_name.clone()),
            FieldPath::Email => FieldValue::Text(self.email.clone()),
            FieldPath::Age => FieldValue::Integer(self.age),
            FieldPath::Gender => FieldValue::Gender(self.gender),
            FieldPath::AddressCity => FieldValue::Text(self.address.city.clone()),
            FieldPath::AddressState => FieldValue::Text(self.address.state.clone()),
            FieldPath::HobbyName(index) => FieldValue::Text(self.hobbies.at(index)?.name.clone()),
            FieldPath::StartDate => FieldValue::Date(self.start_date),
            FieldPath::Subscribe => FieldValue::Flag(self.subscribe),
            FieldPath::Referral => FieldValue::Text(self.referral.clone()),
            FieldPath::Hobbies => return None,
        };
        Some(value)
    }
}
