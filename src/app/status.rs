#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Fill in the form and submit.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn validation_passed(&mut self) {
        self.message = "Validation passed".to_string();
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) remaining");
    }

    pub fn submitting(&mut self) {
        self.message = "Submitting…".to_string();
    }

    pub fn submitted(&mut self) {
        self.message = "Submitted successfully. The form has been reset.".to_string();
    }

    pub fn submission_failed(&mut self, reason: &str) {
        self.message = format!("Submission failed: {reason}");
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
