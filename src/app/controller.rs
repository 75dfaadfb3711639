use serde::Serialize;
use thiserror::Error;

use crate::domain::Record;

use super::submitter::{SubmitFailure, SubmitResponse};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    /// Transient: the controller moves on to `Idle` right after the reset.
    Succeeded,
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionStatus::Submitting)
    }

    /// Label for the submit control.
    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Submitting"
        } else {
            "Submit"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{issues} issue(s) must be fixed before submitting")]
    Invalid { issues: usize },

    #[error("a submission is already in progress")]
    Busy,

    #[error("submission #{0} is not the one in progress")]
    UnknownSubmission(u64),
}

/// How a settled submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(SubmitResponse),
    Rejected(SubmitFailure),
}

/// Ticket for the submission in progress, carrying the validated snapshot.
/// Consumed by settling it.
#[derive(Debug)]
pub struct PendingSubmission {
    attempt: u64,
    record: Record,
}

impl PendingSubmission {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// Owns the submission status and decides whether a submission may start.
#[derive(Debug, Default)]
pub struct SubmissionController {
    status: SubmissionStatus,
    attempts: u64,
    in_flight: Option<u64>,
    succeeded: u64,
}

impl SubmissionController {
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn succeeded_count(&self) -> u64 {
        self.succeeded
    }

    /// Idle/Failed → Submitting.
    pub(crate) fn begin(&mut self, record: Record) -> Result<PendingSubmission, SubmitError> {
        if self.is_busy() {
            return Err(SubmitError::Busy);
        }
        self.attempts += 1;
        self.in_flight = Some(self.attempts);
        self.status = SubmissionStatus::Submitting;
        Ok(PendingSubmission {
            attempt: self.attempts,
            record,
        })
    }

    /// The previous outcome no longer applies (a new validation pass or a
    /// reset replaced it); back to Idle.
    pub(crate) fn return_to_idle(&mut self) {
        if !self.is_busy() {
            self.status = SubmissionStatus::Idle;
        }
    }

    /// Submitting → Succeeded | Failed.
    pub(crate) fn settle(
        &mut self,
        pending: &PendingSubmission,
        result: &Result<SubmitResponse, SubmitFailure>,
    ) -> Result<(), SubmitError> {
        if self.in_flight != Some(pending.attempt) {
            return Err(SubmitError::UnknownSubmission(pending.attempt));
        }
        self.in_flight = None;
        self.status = match result {
            Ok(_) => {
                self.succeeded += 1;
                SubmissionStatus::Succeeded
            }
            Err(failure) => SubmissionStatus::Failed(failure.message.clone()),
        };
        Ok(())
    }

    /// Succeeded → Idle once the record has been reset.
    pub(crate) fn acknowledge(&mut self) {
        if self.status == SubmissionStatus::Succeeded {
            self.status = SubmissionStatus::Idle;
        }
    }
}
