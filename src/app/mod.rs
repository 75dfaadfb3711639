mod controller;
mod engine;
mod options;
mod status;
mod submitter;
mod validation;

pub use controller::{
    PendingSubmission, SubmissionController, SubmissionStatus, SubmitError, SubmitOutcome,
};
pub use engine::FormEngine;
pub use options::{FormOptions, StartDateDefault};
pub use status::{READY_STATUS, StatusLine};
pub use submitter::{SimulatedEndpoint, SubmitFailure, SubmitResponse, Submitter};
pub use validation::{ValidationOutcome, validate, validate_with};
