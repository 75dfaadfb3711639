#![deny(rust_2018_idioms)]
//! Form state and validation engine for a signup form: typed field storage,
//! a schema-driven validator, a hobby list with stable row identity and an
//! async submission lifecycle.

pub mod app;
pub mod domain;
pub mod form;
pub mod io;

pub use app::{
    FormEngine, FormOptions, PendingSubmission, SimulatedEndpoint, StartDateDefault,
    SubmissionStatus, SubmitError, SubmitFailure, SubmitOutcome, SubmitResponse, Submitter,
    ValidationOutcome, validate, validate_with,
};
pub use domain::{FieldPath, FieldValue, FormSchema, Gender, HobbyList, Record, StableId};
pub use form::{CommandError, ErrorMap, FieldStore, FormCommand, InputError, ListError, StoreError};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, ReportOutcome, SubmissionReport, emit,
    load_record_document, parse_document_str,
};

pub mod prelude {
    pub use super::{
        ErrorMap, FieldPath, FieldValue, FormEngine, FormOptions, Record, SimulatedEndpoint,
        SubmissionStatus, SubmitError, SubmitOutcome, Submitter,
    };
}
