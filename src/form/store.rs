use tracing::debug;

use crate::domain::{
    FieldPath, FieldValue, HobbyItem, HobbyList, IdAllocator, Record, RecordDocument, ValueKind,
};

use super::{
    convert::{coerce_input, gender_value},
    error::{FieldCoercionError, InputError, ListError, StoreError},
};

/// The values a store starts from and returns to after a successful
/// submission. Hobby rows are materialized with fresh ids every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDefaults {
    base: Record,
    hobby_rows: usize,
}

impl RecordDefaults {
    /// `base.hobbies` is ignored; `hobby_rows` blank rows are used instead
    /// (at least one).
    pub fn new(mut base: Record, hobby_rows: usize) -> Self {
        base.hobbies = HobbyList::new();
        Self {
            base,
            hobby_rows: hobby_rows.max(1),
        }
    }

    pub fn hobby_rows(&self) -> usize {
        self.hobby_rows
    }

    /// Whether `record` holds exactly the default values, ignoring row ids.
    pub fn matches(&self, record: &Record) -> bool {
        record.hobbies.len() == self.hobby_rows
            && record.hobbies.iter().all(|row| row.name.is_empty())
            && Record {
                hobbies: HobbyList::new(),
                ..record.clone()
            } == self.base
    }

    fn materialize(&self, ids: &mut IdAllocator) -> Record {
        let mut record = self.base.clone();
        record.hobbies = blank_rows(self.hobby_rows, ids);
        record
    }
}

fn blank_rows(count: usize, ids: &mut IdAllocator) -> HobbyList {
    HobbyList::from_items((0..count).map(|_| HobbyItem {
        id: ids.allocate(),
        name: String::new(),
    }))
}

/// Owns the current [`Record`] and the id allocator for its hobby rows.
#[derive(Debug, Clone)]
pub struct FieldStore {
    record: Record,
    defaults: RecordDefaults,
    pub(super) ids: IdAllocator,
}

impl FieldStore {
    pub fn new(defaults: RecordDefaults) -> Self {
        let mut ids = IdAllocator::default();
        let record = defaults.materialize(&mut ids);
        Self {
            record,
            defaults,
            ids,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub(super) fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    pub fn snapshot(&self) -> Record {
        self.record.clone()
    }

    pub fn defaults(&self) -> &RecordDefaults {
        &self.defaults
    }

    pub fn is_pristine(&self) -> bool {
        self.defaults.matches(&self.record)
    }

    pub fn get(&self, path: FieldPath) -> Result<FieldValue, StoreError> {
        self.ensure_addressable(path)?;
        self.record.value(path).ok_or(StoreError::NotAValue(path))
    }

    pub fn set(&mut self, path: FieldPath, value: FieldValue) -> Result<(), StoreError> {
        self.ensure_addressable(path)?;
        let expected = ValueKind::of_path(path).ok_or(StoreError::NotAValue(path))?;
        let mismatch = StoreError::TypeMismatch {
            path,
            expected,
            found: value.kind(),
        };
        let record = &mut self.record;
        match (path, value) {
            (FieldPath::FirstName, FieldValue::Text(text)) => record.first_name = text,
            (FieldPath::LastName, FieldValue::Text(text)) => record.last_name = text,
            (FieldPath::Email, FieldValue::Text(text)) => record.email = text,
            (FieldPath::AddressCity, FieldValue::Text(text)) => record.address.city = text,
            (FieldPath::AddressState, FieldValue::Text(text)) => record.address.state = text,
            (FieldPath::Referral, FieldValue::Text(text)) => record.referral = text,
            (FieldPath::HobbyName(index), FieldValue::Text(text)) => {
                // checked by ensure_addressable
                if let Some(row) = record.hobbies.at_mut(index) {
                    row.name = text;
                }
            }
            (FieldPath::Age, FieldValue::Integer(age)) => record.age = age,
            (FieldPath::Gender, FieldValue::Gender(gender)) => record.gender = gender,
            (FieldPath::StartDate, FieldValue::Date(date)) => record.start_date = date,
            (FieldPath::Subscribe, FieldValue::Flag(flag)) => record.subscribe = flag,
            _ => return Err(mismatch),
        }
        debug!(%path, "field updated");
        Ok(())
    }

    /// Coerces raw input text and stores it. Nothing is written on failure.
    pub fn set_input(&mut self, path: FieldPath, raw: &str) -> Result<(), InputError> {
        self.ensure_addressable(path)?;
        let value = coerce_input(path, raw)?;
        self.set(path, value)?;
        Ok(())
    }

    pub fn hobbies(&self) -> &HobbyList {
        &self.record.hobbies
    }

    /// Replaces every hobby row; each new row gets a fresh id.
    pub fn replace_hobbies<I, S>(&mut self, names: I) -> Result<(), ListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = &mut self.ids;
        let rows = HobbyList::from_items(names.into_iter().map(|name| HobbyItem {
            id: ids.allocate(),
            name: name.into(),
        }));
        if rows.is_empty() {
            return Err(ListError::EmptyList);
        }
        self.record.hobbies = rows;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.record = self.defaults.materialize(&mut self.ids);
        debug!("record reset to defaults");
    }

    /// Replaces the record with `document` laid over the defaults.
    pub fn load_document(&mut self, document: RecordDocument) -> Result<(), FieldCoercionError> {
        let mut record = self.defaults.materialize(&mut self.ids);
        let RecordDocument {
            first_name,
            last_name,
            email,
            age,
            gender,
            address,
            hobbies,
            start_date,
            subscribe,
            referral,
        } = document;

        if let Some(raw) = gender {
            record.gender = gender_value(&raw, FieldPath::Gender)?;
        }
        if let Some(value) = first_name {
            record.first_name = value;
        }
        if let Some(value) = last_name {
            record.last_name = value;
        }
        if let Some(value) = email {
            record.email = value;
        }
        if age.is_some() {
            record.age = age;
        }
        if let Some(address) = address {
            if let Some(city) = address.city {
                record.address.city = city;
            }
            if let Some(state) = address.state {
                record.address.state = state;
            }
        }
        if let Some(rows) = hobbies
            && !rows.is_empty()
        {
            let ids = &mut self.ids;
            record.hobbies = HobbyList::from_items(rows.into_iter().map(|row| HobbyItem {
                id: ids.allocate(),
                name: row.name,
            }));
        }
        if start_date.is_some() {
            record.start_date = start_date;
        }
        if let Some(flag) = subscribe {
            record.subscribe = flag;
        }
        if let Some(value) = referral {
            record.referral = value;
        }

        self.record = record;
        debug!(hobbies = self.record.hobbies.len(), "record loaded from document");
        Ok(())
    }

    fn ensure_addressable(&self, path: FieldPath) -> Result<(), StoreError> {
        match path {
            FieldPath::HobbyName(index) if index >= self.record.hobbies.len() => {
                Err(StoreError::OutOfRange {
                    path,
                    len: self.record.hobbies.len(),
                })
            }
            _ => Ok(()),
        }
    }
}
