use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str() == raw)
            .ok_or_else(|| {
                let options: Vec<&str> = Gender::ALL.iter().map(Gender::as_str).collect();
                format!("value '{raw}' is not one of: {}", options.join(", "))
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    pub city: String,
    pub state: String,
}

/// Identity of a hobby row. Allocated by the store, never reused and never
/// derived from the row's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StableId(u64);

impl StableId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Monotonic source of [`StableId`]s.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> StableId {
        self.next += 1;
        StableId(self.next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HobbyItem {
    pub id: StableId,
    pub name: String,
}

/// Hobby rows keyed by identity; iteration order is display order.
#[derive(Debug, Clone, Default)]
pub struct HobbyList {
    entries: IndexMap<StableId, HobbyItem>,
}

impl HobbyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = HobbyItem>) -> Self {
        Self {
            entries: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HobbyItem> {
        self.entries.values()
    }

    pub fn ids(&self) -> Vec<StableId> {
        self.entries.keys().copied().collect()
    }

    pub fn get(&self, id: StableId) -> Option<&HobbyItem> {
        self.entries.get(&id)
    }

    pub fn at(&self, index: usize) -> Option<&HobbyItem> {
        self.entries.get_index(index).map(|(_, item)| item)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut HobbyItem> {
        self.entries.get_index_mut(index).map(|(_, item)| item)
    }

    pub fn position(&self, id: StableId) -> Option<usize> {
        self.entries.get_index_of(&id)
    }

    pub(crate) fn push(&mut self, item: HobbyItem) {
        self.entries.insert(item.id, item);
    }

    /// Removes `id`, shifting later rows up. Returns the old position.
    pub(crate) fn shift_remove(&mut self, id: StableId) -> Option<(usize, HobbyItem)> {
        self.entries
            .shift_remove_full(&id)
            .map(|(index, _, item)| (index, item))
    }
}

// IndexMap equality ignores order; rows are only equal in the same order.
impl PartialEq for HobbyList {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.iter().eq(other.iter())
    }
}

impl Eq for HobbyList {}

impl Serialize for HobbyList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// The full form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub address: Address,
    pub hobbies: HobbyList,
    pub start_date: Option<NaiveDate>,
    pub subscribe: bool,
    pub referral: String,
}

/// Raw record as read from a document. Every field is optional; missing
/// values fall back to the store defaults.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordDocument {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    /// `male`, `female`, or empty for unset.
    pub gender: Option<String>,
    pub address: Option<AddressDocument>,
    pub hobbies: Option<Vec<HobbyDocument>>,
    pub start_date: Option<NaiveDate>,
    pub subscribe: Option<bool>,
    pub referral: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct AddressDocument {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct HobbyDocument {
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(ids: &mut IdAllocator, name: &str) -> HobbyItem {
        HobbyItem {
            id: ids.allocate(),
            name: name.to_string(),
        }
    }

    #[test]
    fn allocator_never_repeats() {
        let mut ids = IdAllocator::default();
        let first = ids.allocate();
        let second = ids.allocate();
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn hobby_list_equality_respects_order() {
        let mut ids = IdAllocator::default();
        let a = item(&mut ids, "chess");
        let b = item(&mut ids, "climbing");
        let forward = HobbyList::from_items([a.clone(), b.clone()]);
        let backward = HobbyList::from_items([b, a]);
        assert_ne!(forward, backward);
    }

    #[test]
    fn shift_remove_reports_old_position() {
        let mut ids = IdAllocator::default();
        let rows = ["a", "b", "c"].map(|name| item(&mut ids, name));
        let target = rows[1].id;
        let mut list = HobbyList::from_items(rows);
        let (index, removed) = list.shift_remove(target).expect("present");
        assert_eq!(index, 1);
        assert_eq!(removed.name, "b");
        assert_eq!(list.at(1).map(|row| row.name.as_str()), Some("c"));
    }

    #[test]
    fn hobbies_serialize_as_array() {
        let mut ids = IdAllocator::default();
        let list = HobbyList::from_items([item(&mut ids, "chess")]);
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!([{"id": 1, "name": "chess"}])
        );
    }

    #[test]
    fn gender_parses_closed_set_only() {
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        let err = "other".parse::<Gender>().unwrap_err();
        assert!(err.contains("male, female"));
    }
}
