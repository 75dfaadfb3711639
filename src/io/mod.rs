//! Document formats, record loading and report output.

mod format;
mod input;
mod output;
mod report;

pub use format::DocumentFormat;
pub use input::{load_record_document, parse_document_str, record_document_from_value, record_schema};
pub use output::{OutputDestination, OutputOptions, emit};
pub use report::{ReportOutcome, SubmissionReport};
