//! Failure taxonomy shared by the adapter and the orchestrator.

use serde::Serialize;
use thiserror::Error;

/// A single field that failed input validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while serving an employee operation.
#[derive(Debug, Error)]
pub enum EmployeeError {
    /// No record matches the requested identifier.
    #[error("Employee not found: {0}")]
    NotFound(String),

    /// Input failed local or upstream constraint checks.
    #[error("Validation failed: {}", describe(.0))]
    Validation(Vec<FieldViolation>),

    /// Upstream answered, but with an error status or an unreadable envelope.
    #[error("Upstream error{}: {message}", status_suffix(.status))]
    Upstream { status: Option<u16>, message: String },

    /// Upstream could not be reached at all.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl EmployeeError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for employee operations.
pub type EmployeeResult<T> = Result<T, EmployeeError>;
