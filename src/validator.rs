//! Contract between the submission tool and per-submission-type validators.
//!
//! Sequence, assembly and read validators live outside this crate; each one
//! implements [`Validator`] for its own manifest type.

use serde::Serialize;

/// Marker for manifest inputs handed to a [`Validator`].
pub trait Manifest {}

pub trait Validator<M: Manifest> {
    /// Validates `manifest` and reports every message produced along the way.
    fn validate(&self, manifest: &M) -> ValidationResponse;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResponse {
    status: ValidationStatus,
    messages: Vec<ValidationMessage>,
}

impl Default for ValidationResponse {
    fn default() -> Self {
        Self::success()
    }
}

impl ValidationResponse {
    pub fn success() -> Self {
        Self {
            status: ValidationStatus::Success,
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, severity: Severity, text: impl Into<String>) -> Self {
        self.add_message(severity, text);
        self
    }

    pub fn add_message(&mut self, severity: Severity, text: impl Into<String>) {
        if severity == Severity::Error {
            self.status = ValidationStatus::Failed;
        }
        self.messages.push(ValidationMessage {
            severity,
            text: text.into(),
        });
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == ValidationStatus::Success
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }
}
