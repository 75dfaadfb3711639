use std::{fmt, str::FromStr};

use thiserror::Error;

/// Address of one value inside a [`Record`](super::Record).
///
/// Paths render and parse in the dotted form used as [`ErrorMap`] keys,
/// e.g. `address.city` or `hobbies.2.name`.
///
/// [`ErrorMap`]: crate::ErrorMap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    FirstName,
    LastName,
    Email,
    Age,
    Gender,
    AddressCity,
    AddressState,
    /// The hobbies sequence as a whole.
    Hobbies,
    /// Name of the hobby at a display position.
    HobbyName(usize),
    StartDate,
    Subscribe,
    Referral,
}

/// The fixed (non-indexed) paths in declaration order.
pub const SCALAR_PATHS: [FieldPath; 11] = [
    FieldPath::FirstName,
    FieldPath::LastName,
    FieldPath::Email,
    FieldPath::Age,
    FieldPath::Gender,
    FieldPath::AddressCity,
    FieldPath::AddressState,
    FieldPath::Hobbies,
    FieldPath::StartDate,
    FieldPath::Subscribe,
    FieldPath::Referral,
];

impl FieldPath {
    pub fn hobby_index(&self) -> Option<usize> {
        match self {
            FieldPath::HobbyName(index) => Some(*index),
            _ => None,
        }
    }

    fn static_name(&self) -> Option<&'static str> {
        let name = match self {
            FieldPath::FirstName => "firstName",
            FieldPath::LastName => "lastName",
            FieldPath::Email => "email",
            FieldPath::Age => "age",
            FieldPath::Gender => "gender",
            FieldPath::AddressCity => "address.city",
            FieldPath::AddressState => "address.state",
            FieldPath::Hobbies => "hobbies",
            FieldPath::StartDate => "startDate",
            FieldPath::Subscribe => "subscribe",
            FieldPath::Referral => "referral",
            FieldPath::HobbyName(_) => return None,
        };
        Some(name)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::HobbyName(index) => write!(f, "hobbies.{index}.name"),
            other => f.write_str(other.static_name().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field path '{0}'")]
pub struct UnknownPath(pub String);

impl FromStr for FieldPath {
    type Err = UnknownPath;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Some(found) = SCALAR_PATHS
            .iter()
            .find(|path| path.static_name() == Some(raw))
        {
            return Ok(*found);
        }
        let mut segments = raw.split('.');
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some("hobbies"), Some(index), Some("name"), None) => index
                .parse::<usize>()
                .map(FieldPath::HobbyName)
                .map_err(|_| UnknownPath(raw.to_string())),
            _ => Err(UnknownPath(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_and_indexed_paths() {
        assert_eq!(FieldPath::AddressCity.to_string(), "address.city");
        assert_eq!(FieldPath::HobbyName(2).to_string(), "hobbies.2.name");
        assert_eq!(FieldPath::StartDate.to_string(), "startDate");
    }

    #[test]
    fn parses_every_rendered_path() {
        for path in SCALAR_PATHS
            .iter()
            .copied()
            .chain([FieldPath::HobbyName(0), FieldPath::HobbyName(17)])
        {
            assert_eq!(path.to_string().parse::<FieldPath>(), Ok(path));
        }
    }

    #[test]
    fn rejects_unknown_paths() {
        assert!("address".parse::<FieldPath>().is_err());
        assert!("hobbies.x.name".parse::<FieldPath>().is_err());
        assert!("hobbies.1.name.extra".parse::<FieldPath>().is_err());
        assert!("root".parse::<FieldPath>().is_err());
    }
}
