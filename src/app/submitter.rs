use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::Record;

/// Opaque payload returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitResponse {
    pub data: Value,
}

impl SubmitResponse {
    pub fn new(data: Value) -> Self {
        Self { data }
    }
}

/// A failed submission. `message` becomes the form's root error verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitFailure {
    pub message: String,
}

impl SubmitFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The remote side of a submission.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, record: &Record) -> Result<SubmitResponse, SubmitFailure>;
}

/// Stand-in endpoint: waits `latency`, then echoes the record back or fails
/// with the configured message.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEndpoint {
    latency: Duration,
    failure: Option<String>,
}

impl SimulatedEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

#[async_trait]
impl Submitter for SimulatedEndpoint {
    async fn submit(&self, record: &Record) -> Result<SubmitResponse, SubmitFailure> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(message) = &self.failure {
            debug!(reason = %message, "simulated endpoint rejecting submission");
            return Err(SubmitFailure::new(message.clone()));
        }
        let data = serde_json::to_value(record)
            .map_err(|err| SubmitFailure::new(format!("failed to encode record: {err}")))?;
        Ok(SubmitResponse::new(data))
    }
}
