use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use super::{FieldPath, FieldValue, Record};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Which value(s) a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Field(FieldPath),
    /// The name of every hobby row, reported per row.
    EachHobbyName,
}

impl Target {
    fn covers(&self, path: FieldPath) -> bool {
        match self {
            Target::Field(field) => *field == path,
            Target::EachHobbyName => matches!(path, FieldPath::HobbyName(_)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Text that is non-empty after trimming.
    NonBlank,
    /// `local@domain` address.
    Email,
    /// Optional values (age, gender, date) must be set.
    Present,
    /// Integer lower bound, inclusive.
    AtLeast(i64),
    /// Sequence length lower bound.
    MinItems(usize),
}

impl Check {
    /// Whether a single value passes. A check paired with a value kind it
    /// does not apply to fails, so a misconfigured rule surfaces as an error.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Check::NonBlank | Check::Present, FieldValue::Text(text)) => !text.trim().is_empty(),
            (Check::NonBlank | Check::Present, FieldValue::Integer(value)) => value.is_some(),
            (Check::NonBlank | Check::Present, FieldValue::Gender(value)) => value.is_some(),
            (Check::NonBlank | Check::Present, FieldValue::Date(value)) => value.is_some(),
            (Check::NonBlank | Check::Present, FieldValue::Flag(_)) => true,
            // Stored text is matched as-is; surrounding whitespace is not an address.
            (Check::Email, FieldValue::Text(text)) => EMAIL_PATTERN.is_match(text),
            (Check::AtLeast(min), FieldValue::Integer(value)) => value.is_some_and(|v| v >= *min),
            (Check::Email, _) | (Check::AtLeast(_), _) | (Check::MinItems(_), _) => false,
        }
    }

    /// Whether a sequence of `len` items passes.
    pub fn accepts_len(&self, len: usize) -> bool {
        match self {
            Check::MinItems(min) => len >= *min,
            Check::NonBlank | Check::Present => len > 0,
            Check::Email | Check::AtLeast(_) => false,
        }
    }

    fn demands_presence(&self) -> bool {
        matches!(self, Check::NonBlank | Check::Present | Check::MinItems(_))
    }
}

/// Cross-field predicate, evaluated against the current record every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The boolean at the path is `true`.
    FlagSet(FieldPath),
}

impl Condition {
    pub fn holds(&self, record: &Record) -> bool {
        match self {
            Condition::FlagSet(path) => matches!(record.value(*path), Some(FieldValue::Flag(true))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub target: Target,
    pub check: Check,
    pub message: Cow<'static, str>,
    pub when: Option<Condition>,
}

impl FieldRule {
    pub fn new(target: Target, check: Check, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            target,
            check,
            message: message.into(),
            when: None,
        }
    }

    pub fn field(path: FieldPath, check: Check, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Target::Field(path), check, message)
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.when = Some(condition);
        self
    }

    pub fn is_active(&self, record: &Record) -> bool {
        self.when.is_none_or(|condition| condition.holds(record))
    }
}

/// A field that is only shown while its condition holds.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityRule {
    pub field: FieldPath,
    pub when: Condition,
}

/// Declarative description of the form: ordered rules plus visibility.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
    visibility: Vec<VisibilityRule>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn visible_when(mut self, field: FieldPath, when: Condition) -> Self {
        self.visibility.push(VisibilityRule { field, when });
        self
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// The sign-up form: personal data, address, hobbies, start date and the
    /// newsletter referral that is only required once subscribed.
    pub fn signup() -> Self {
        use Check::*;
        use FieldPath as P;

        let subscribed = Condition::FlagSet(P::Subscribe);
        Self::new()
            .rule(FieldRule::field(P::FirstName, NonBlank, "First Name is Required"))
            .rule(FieldRule::field(P::LastName, NonBlank, "Last Name is Required"))
            .rule(FieldRule::field(P::Email, NonBlank, "Email is Required"))
            .rule(FieldRule::field(P::Email, Email, "Invalid email address"))
            .rule(FieldRule::field(P::Age, Present, "Age is Required"))
            .rule(FieldRule::field(P::Age, AtLeast(18), "You must be at least 18 years old"))
            .rule(FieldRule::field(P::Gender, Present, "Gender is Required"))
            .rule(FieldRule::field(P::AddressCity, NonBlank, "City is Required"))
            .rule(FieldRule::field(P::AddressState, NonBlank, "State is Required"))
            .rule(FieldRule::field(P::Hobbies, MinItems(1), "At least one hobby is required"))
            .rule(FieldRule::new(Target::EachHobbyName, NonBlank, "Hobby name is required"))
            .rule(FieldRule::field(P::StartDate, Present, "Start Date is Required"))
            .rule(
                FieldRule::field(P::Referral, NonBlank, "Referral source is required")
                    .when(subscribed),
            )
            .visible_when(P::Referral, subscribed)
    }

    pub fn is_visible(&self, path: FieldPath, record: &Record) -> bool {
        self.visibility
            .iter()
            .filter(|rule| rule.field == path)
            .all(|rule| rule.when.holds(record))
    }

    pub fn is_required(&self, path: FieldPath, record: &Record) -> bool {
        self.rules.iter().any(|rule| {
            rule.target.covers(path) && rule.check.demands_presence() && rule.is_active(record)
        })
    }
}
