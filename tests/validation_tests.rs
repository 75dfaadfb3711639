use chrono::NaiveDate;
use schemaform::{
    FieldPath, FieldStore, FieldValue, FormEngine, FormOptions, FormSchema, Gender, HobbyList,
    Record, StartDateDefault, ValidationOutcome,
    domain::{Address, Check, FieldRule, HobbyItem, IdAllocator},
    form::RecordDefaults,
    validate,
};

fn valid_record() -> Record {
    let mut ids = IdAllocator::default();
    Record {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        age: Some(36),
        gender: Some(Gender::Female),
        address: Address {
            city: "London".into(),
            state: "Greater London".into(),
        },
        hobbies: HobbyList::from_items([HobbyItem {
            id: ids.allocate(),
            name: "mathematics".into(),
        }]),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        subscribe: false,
        referral: String::new(),
    }
}

#[test]
fn a_complete_record_has_no_errors() {
    assert!(validate(&valid_record()).is_empty());
}

#[test]
fn each_missing_required_field_is_reported_at_its_path() {
    let cases: Vec<(&str, Box<dyn Fn(&mut Record)>)> = vec![
        ("firstName", Box::new(|r| r.first_name.clear())),
        ("lastName", Box::new(|r| r.last_name.clear())),
        ("email", Box::new(|r| r.email.clear())),
        ("age", Box::new(|r| r.age = None)),
        ("gender", Box::new(|r| r.gender = None)),
        ("address.city", Box::new(|r| r.address.city.clear())),
        ("address.state", Box::new(|r| r.address.state.clear())),
        ("startDate", Box::new(|r| r.start_date = None)),
    ];
    for (path, clear) in cases {
        let mut record = valid_record();
        clear(&mut record);
        let errors = validate(&record);
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec![path], "{path}");
    }
}

#[test]
fn the_underage_signup_from_the_form_reports_every_problem() {
    let record = Record {
        first_name: String::new(),
        age: Some(16),
        gender: None,
        hobbies: HobbyList::new(),
        ..valid_record()
    };
    let errors = validate(&record);
    assert_eq!(errors.get("firstName"), Some("First Name is Required"));
    assert_eq!(errors.get("age"), Some("You must be at least 18 years old"));
    assert_eq!(errors.get("gender"), Some("Gender is Required"));
    assert_eq!(errors.get("hobbies"), Some("At least one hobby is required"));
    assert_eq!(errors.len(), 4);
}

#[test]
fn malformed_email_is_distinguished_from_missing_email() {
    let mut record = valid_record();
    record.email = "ada@example".into();
    assert_eq!(validate(&record).get("email"), Some("Invalid email address"));
    record.email = "   ".into();
    assert_eq!(validate(&record).get("email"), Some("Email is Required"));
}

#[test]
fn padded_email_is_not_a_valid_address() {
    let mut engine = FormEngine::new();
    engine.set_input(FieldPath::Email, " ada@example.com ").unwrap();
    assert_eq!(engine.record().email, " ada@example.com ");
    assert_eq!(
        engine.check().get("email"),
        Some("Invalid email address")
    );
}

#[test]
fn eighteen_is_old_enough() {
    let mut record = valid_record();
    record.age = Some(18);
    assert!(validate(&record).is_empty());
    record.age = Some(17);
    assert!(validate(&record).contains("age"));
}

#[test]
fn blank_hobby_names_are_reported_per_row() {
    let mut record = valid_record();
    let mut ids = IdAllocator::default();
    record.hobbies = HobbyList::from_items(["chess", "", "  "].map(|name| HobbyItem {
        id: ids.allocate(),
        name: name.into(),
    }));
    let errors = validate(&record);
    assert_eq!(
        errors.keys().collect::<Vec<_>>(),
        vec!["hobbies.1.name", "hobbies.2.name"]
    );
    assert!(!errors.contains("hobbies"));
}

#[test]
fn referral_is_only_checked_for_subscribers() {
    let mut record = valid_record();
    record.referral = String::new();
    assert!(!validate(&record).contains("referral"));

    record.subscribe = true;
    assert_eq!(
        validate(&record).get("referral"),
        Some("Referral source is required")
    );

    record.referral = "a friend".into();
    assert!(validate(&record).is_empty());

    record.subscribe = false;
    record.referral = "left over".into();
    assert!(validate(&record).is_empty());
}

#[test]
fn validation_is_idempotent() {
    let mut engine = FormEngine::with_options(
        FormOptions::default().with_start_date(StartDateDefault::Unset),
    );
    engine
        .set(FieldPath::Age, FieldValue::Integer(Some(12)))
        .unwrap();
    let first = engine.validate().unwrap();
    let errors = engine.errors().clone();
    assert_eq!(engine.validate(), Ok(first));
    assert_eq!(engine.errors(), &errors);
    assert_eq!(validate(engine.record()), errors);
    assert!(errors.contains("startDate"));
}

#[test]
fn engines_accept_a_custom_schema_and_store() {
    let store = FieldStore::new(RecordDefaults::new(valid_record(), 2));
    assert_eq!(store.defaults().hobby_rows(), 2);
    let ids: Vec<u64> = store.hobbies().ids().iter().map(|id| id.get()).collect();
    assert_eq!(ids, [1, 2]);

    let schema = FormSchema::new().rule(FieldRule::field(
        FieldPath::Referral,
        Check::NonBlank,
        "Tell us who sent you",
    ));
    let mut engine = FormEngine::new().with_store(store).with_schema(schema);
    assert_eq!(engine.record().first_name, "Ada");
    assert_eq!(engine.schema().rules().len(), 1);

    // The blank hobby rows would fail the signup rules; only the custom rule applies.
    assert_eq!(
        engine.validate(),
        Ok(ValidationOutcome::Invalid { issues: 1 })
    );
    assert_eq!(
        engine.errors().field(FieldPath::Referral),
        Some("Tell us who sent you")
    );

    engine.set_input(FieldPath::Referral, "a friend").unwrap();
    assert_eq!(engine.validate(), Ok(ValidationOutcome::Valid));

    engine.reset().unwrap();
    assert_eq!(engine.record().referral, "");
    assert_eq!(engine.record().first_name, "Ada");
    assert_eq!(engine.record().hobbies.len(), 2);
}
