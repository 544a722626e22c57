//! Pipeline failure taxonomy and the quarantined error entity.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One violated business rule: the offending field and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub field: String,
    pub reason: String,
}

impl RuleViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Classified failure from any ingestion stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input is not well-formed XML. Carries the first parser-reported
    /// defect and its byte position.
    #[error("malformed document at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// Input is well-formed but violates the business-rule set for its kind.
    /// All violations for the document are accumulated.
    #[error("validation failed: {}", format_violations(.0))]
    Validation(Vec<RuleViolation>),

    /// Input passed validation but cannot be mapped to canonical records.
    #[error("transformation failed: {0}")]
    Transformation(String),

    /// A reference lookup itself failed (distinct from the best-effort
    /// hospital-name fallback, which never errors).
    #[error("reference resolution failed: {0}")]
    Reference(String),

    /// The storage write failed.
    #[error("persistence failed: {0}")]
    Persistence(String),
}

fn format_violations(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Malformed { .. } => ErrorKind::Malformed,
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::Transformation(_) => ErrorKind::Transformation,
            PipelineError::Reference(_) => ErrorKind::Reference,
            PipelineError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Field names implicated in the failure, for field-level quarantine.
    pub fn offending_fields(&self) -> Vec<String> {
        match self {
            PipelineError::Validation(violations) => {
                violations.iter().map(|v| v.field.clone()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Classification stored with each quarantined failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Malformed,
    Validation,
    Transformation,
    Reference,
    Persistence,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Malformed => "malformed",
            ErrorKind::Validation => "validation",
            ErrorKind::Transformation => "transformation",
            ErrorKind::Reference => "reference",
            ErrorKind::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One quarantined submission failure.
///
/// Immutable once created, except for the resolve operation which flips
/// `resolved` and attaches free-text notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationError {
    pub id: u64,
    pub kind: ErrorKind,
    pub message: String,
    /// Field names implicated in the failure (empty when the failure is not
    /// attributable to specific fields, e.g. malformed input).
    pub offending_fields: Vec<String>,
    pub raw_payload: String,
    pub occurred_at: NaiveDateTime,
    pub resolved: bool,
    pub resolution_notes: Option<String>,
}
