use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use schemaform::{
    FieldPath, FormEngine, FormOptions, Record, SimulatedEndpoint, StartDateDefault,
    SubmissionStatus, SubmitError, SubmitFailure, SubmitOutcome, SubmitResponse, Submitter,
};
use serde_json::json;

/// Counts calls and remembers what it was given.
struct RecordingSubmitter {
    calls: AtomicUsize,
    seen: Mutex<Vec<Record>>,
    failure: Option<String>,
}

impl RecordingSubmitter {
    fn accepting() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::accepting()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, record: &Record) -> Result<SubmitResponse, SubmitFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(record.clone());
        match &self.failure {
            Some(message) => Err(SubmitFailure::new(message.clone())),
            None => Ok(SubmitResponse::new(json!({"id": 7}))),
        }
    }
}

fn engine() -> FormEngine {
    FormEngine::with_options(FormOptions::default().with_start_date(StartDateDefault::Fixed(
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    )))
}

fn fill_valid(engine: &mut FormEngine) {
    for (path, raw) in [
        ("firstName", "Ada"),
        ("lastName", "Lovelace"),
        ("email", "ada@example.com"),
        ("age", "36"),
        ("gender", "female"),
        ("address.city", "London"),
        ("address.state", "Greater London"),
        ("hobbies.0.name", "mathematics"),
    ] {
        engine.set_input(path.parse().unwrap(), raw).unwrap();
    }
}

#[tokio::test]
async fn invalid_records_never_reach_the_collaborator() {
    let mut engine = engine();
    engine.set_input(FieldPath::Age, "16").unwrap();
    let submitter = RecordingSubmitter::accepting();

    let result = engine.submit(&submitter).await;

    assert!(matches!(result, Err(SubmitError::Invalid { .. })));
    assert_eq!(submitter.calls(), 0);
    for path in ["firstName", "age", "gender", "hobbies.0.name"] {
        assert!(engine.errors().contains(path), "missing {path}");
    }
    assert_eq!(engine.status(), &SubmissionStatus::Idle);
}

#[tokio::test]
async fn success_resets_the_form_and_clears_errors() {
    let mut engine = engine();
    fill_valid(&mut engine);
    let submitted = engine.record().clone();
    let submitter = RecordingSubmitter::accepting();

    let outcome = engine.submit(&submitter).await.unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Succeeded(SubmitResponse::new(json!({"id": 7})))
    );
    assert_eq!(submitter.calls(), 1);
    assert_eq!(submitter.seen.lock().unwrap()[0], submitted);
    assert!(engine.store().is_pristine());
    assert!(engine.errors().is_empty());
    assert_eq!(engine.status(), &SubmissionStatus::Idle);
    assert_eq!(engine.succeeded_count(), 1);
    assert_eq!(engine.record().age, Some(18));
    assert_eq!(engine.record().hobbies.len(), 1);
}

#[tokio::test]
async fn failure_keeps_the_record_and_sets_only_the_root_error() {
    let mut engine = engine();
    fill_valid(&mut engine);
    let before = engine.record().clone();
    let submitter = RecordingSubmitter::failing("Network error");

    let outcome = engine.submit(&submitter).await.unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(SubmitFailure::new("Network error"))
    );
    assert_eq!(submitter.calls(), 1);
    assert_eq!(engine.record(), &before);
    assert_eq!(engine.errors().len(), 1);
    assert_eq!(engine.errors().root_message(), Some("Network error"));
    assert_eq!(
        engine.status(),
        &SubmissionStatus::Failed("Network error".into())
    );
    assert_eq!(engine.submit_label(), "Submit");
}

#[tokio::test]
async fn retry_after_failure_clears_the_root_error() {
    let mut engine = engine();
    fill_valid(&mut engine);
    engine
        .submit(&RecordingSubmitter::failing("Network error"))
        .await
        .unwrap();

    let outcome = engine
        .submit(&RecordingSubmitter::accepting())
        .await
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
    assert!(engine.errors().root_message().is_none());
}

#[tokio::test]
async fn a_second_submit_while_in_flight_is_busy() {
    let mut engine = engine();
    fill_valid(&mut engine);
    let pending = engine.begin_submit().unwrap();
    assert!(engine.status().is_submitting());
    assert_eq!(engine.submit_label(), "Submitting");

    let submitter = RecordingSubmitter::accepting();
    assert_eq!(engine.submit(&submitter).await, Err(SubmitError::Busy));
    assert_eq!(engine.begin_submit().unwrap_err(), SubmitError::Busy);
    assert_eq!(submitter.calls(), 0);
    assert!(engine.status().is_submitting());

    let result = submitter.submit(pending.record()).await;
    engine.settle(pending, result).unwrap();
    assert_eq!(submitter.calls(), 1);
    assert_eq!(engine.status(), &SubmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn simulated_endpoint_waits_then_echoes_the_record() {
    let mut engine = engine();
    fill_valid(&mut engine);
    let endpoint = SimulatedEndpoint::new().with_latency(Duration::from_secs(1));
    let started = tokio::time::Instant::now();

    let outcome = engine.submit(&endpoint).await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(1));
    let SubmitOutcome::Succeeded(response) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(response.data["firstName"], json!("Ada"));
    assert_eq!(response.data["address"]["city"], json!("London"));
    assert_eq!(response.data["hobbies"][0]["name"], json!("mathematics"));
}

#[tokio::test]
async fn simulated_endpoint_can_fail() {
    let mut engine = engine();
    fill_valid(&mut engine);
    let endpoint = SimulatedEndpoint::new().failing_with("Service unavailable");

    engine.submit(&endpoint).await.unwrap();

    assert_eq!(
        engine.errors().root_message(),
        Some("Service unavailable")
    );
    assert_eq!(
        engine.status_message(),
        "Submission failed: Service unavailable"
    );
}
