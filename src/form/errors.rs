use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::FieldPath;

/// Field path → message. A missing key means the field is valid.
///
/// Keys keep the order in which they were reported, which is schema order
/// for validation passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    entries: IndexMap<String, String>,
}

impl ErrorMap {
    /// Key for errors that belong to the form as a whole.
    pub const ROOT: &'static str = "root";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(message: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.entries.insert(Self::ROOT.to_string(), message.into());
        map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn field(&self, path: FieldPath) -> Option<&str> {
        self.get(&path.to_string())
    }

    pub fn root_message(&self) -> Option<&str> {
        self.get(Self::ROOT)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, message)| (key.as_str(), message.as_str()))
    }

    /// Records `message` unless the path already has one; the first failing
    /// rule for a path wins.
    pub(crate) fn report(&mut self, path: FieldPath, message: &str) {
        self.entries
            .entry(path.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Drops entries of the hobby row that was at `removed` and moves the
    /// entries of every later row one position up.
    pub(crate) fn forget_hobby(&mut self, removed: usize) {
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .filter_map(|(key, message)| {
                match key.parse::<FieldPath>().ok().and_then(|path| path.hobby_index()) {
                    Some(index) if index == removed => None,
                    Some(index) if index > removed => {
                        Some((FieldPath::HobbyName(index - 1).to_string(), message))
                    }
                    _ => Some((key, message)),
                }
            })
            .collect();
    }

    /// Drops every per-row hobby entry.
    pub(crate) fn forget_hobby_rows(&mut self) {
        self.entries
            .retain(|key, _| !matches!(key.parse::<FieldPath>(), Ok(FieldPath::HobbyName(_))));
    }
}
