//! Structural validation of signal payloads before submission.
//!
//! Complements the per-step checks of the wizard: this pass looks at the
//! whole payload (query depth, schedule, selection, delivery) and returns a
//! [`ValidationResult`] with errors (block save) and warnings (advisory).

mod delivery_checks;
mod query_checks;
mod schedule_checks;

pub mod fuzzy;

use serde::{Deserialize, Serialize};

use crate::schema::SignalPayload;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"schedulePolicy.timezone"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn has_error_at(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a signal payload as it would be submitted.
pub fn validate_payload(payload: &SignalPayload) -> ValidationResult {
    let mut result = ValidationResult::new();
    if payload.name.trim().is_empty() {
        result.error("name", "Signal name must not be empty");
    }
    query_checks::validate_queries(payload, &mut result);
    schedule_checks::validate_schedule(payload, &mut result);
    delivery_checks::validate_selection(payload, &mut result);
    delivery_checks::validate_delivery(payload, &mut result);
    result
}

/// Parse a JSON payload and validate. Returns parse errors as validation errors.
pub fn validate_json(json: &str) -> ValidationResult {
    match serde_json::from_str::<SignalPayload>(json) {
        Ok(payload) => validate_payload(&payload),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("JSON parse error: {e}"));
            result
        }
    }
}
