use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::{
    domain::{Address, HobbyList, Record},
    form::RecordDefaults,
};

/// What the start date holds when the form is created or reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartDateDefault {
    /// The local calendar date at the moment the engine is built.
    #[default]
    Today,
    Fixed(NaiveDate),
    Unset,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormOptions {
    pub default_age: Option<i64>,
    pub start_date: StartDateDefault,
    /// Blank hobby rows on a fresh form; never less than one.
    pub hobby_rows: usize,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            default_age: Some(18),
            start_date: StartDateDefault::Today,
            hobby_rows: 1,
        }
    }
}

impl FormOptions {
    pub fn with_default_age(mut self, age: Option<i64>) -> Self {
        self.default_age = age;
        self
    }

    pub fn with_start_date(mut self, start_date: StartDateDefault) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn with_hobby_rows(mut self, rows: usize) -> Self {
        self.hobby_rows = rows.max(1);
        self
    }

    pub fn resolve_defaults(&self) -> RecordDefaults {
        self.resolve_defaults_on(Local::now().date_naive())
    }

    /// Resolves the defaults as if today were `today`.
    pub fn resolve_defaults_on(&self, today: NaiveDate) -> RecordDefaults {
        let start_date = match self.start_date {
            StartDateDefault::Today => Some(today),
            StartDateDefault::Fixed(date) => Some(date),
            StartDateDefault::Unset => None,
        };
        RecordDefaults::new(
            Record {
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
                age: self.default_age,
                gender: None,
                address: Address::default(),
                hobbies: HobbyList::new(),
                start_date,
                subscribe: false,
                referral: String::new(),
            },
            self.hobby_rows,
        )
    }
}
