use serde::Serialize;
use serde_json::Value;

use crate::{
    app::{FormEngine, SubmissionStatus, SubmitError, SubmitOutcome, ValidationOutcome},
    domain::Record,
    form::ErrorMap,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportOutcome {
    Valid,
    Invalid,
    Submitted,
    Rejected,
}

impl ReportOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, ReportOutcome::Valid | ReportOutcome::Submitted)
    }
}

/// What a caller sees after validating or submitting a form: the outcome,
/// the engine's state afterwards and the collaborator's response, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    pub outcome: ReportOutcome,
    pub status: SubmissionStatus,
    pub message: String,
    pub errors: ErrorMap,
    pub record: Record,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl SubmissionReport {
    fn capture(engine: &FormEngine, outcome: ReportOutcome, response: Option<Value>) -> Self {
        Self {
            outcome,
            status: engine.status().clone(),
            message: engine.status_message().to_string(),
            errors: engine.errors().clone(),
            record: engine.record().clone(),
            response,
        }
    }

    pub fn validated(engine: &FormEngine, outcome: ValidationOutcome) -> Self {
        let outcome = if outcome.is_valid() {
            ReportOutcome::Valid
        } else {
            ReportOutcome::Invalid
        };
        Self::capture(engine, outcome, None)
    }

    pub fn submitted(engine: &FormEngine, result: Result<SubmitOutcome, SubmitError>) -> Self {
        match result {
            Ok(SubmitOutcome::Succeeded(response)) => {
                Self::capture(engine, ReportOutcome::Submitted, Some(response.data))
            }
            Ok(SubmitOutcome::Rejected(_)) => Self::capture(engine, ReportOutcome::Rejected, None),
            Err(SubmitError::Invalid { .. }) => Self::capture(engine, ReportOutcome::Invalid, None),
            Err(_) => Self::capture(engine, ReportOutcome::Rejected, None),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
