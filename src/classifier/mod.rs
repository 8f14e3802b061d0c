//! Classification of a document excerpt into a category and a clean filename.
//!
//! The planner only sees the [`Classifier`] trait. [`OpenAiClassifier`] talks to
//! an OpenAI-compatible chat completions endpoint, retries transient failures on
//! its own and never returns an error: exhaustion becomes [`Outcome::Failed`].

use crate::core_types::file_stem;
use chrono::NaiveDate;
use thiserror::Error;

mod normalize;
mod openai;
mod prompt;
mod retry;

pub use openai::OpenAiClassifier;
pub use retry::RetryPolicy;

/// What the classifier is told about one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRequest<'a> {
    /// Original file name, including extension.
    pub filename: &'a str,
    /// Lowercase extension with leading dot.
    pub extension: &'a str,
    /// Text excerpt, already truncated to the character budget.
    pub excerpt: &'a str,
}

/// A successful classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Category from the configured vocabulary.
    pub category: String,
    /// Proposed file name without extension.
    pub suggested_basename: String,
    /// Model confidence between 0.0 and 1.0.
    pub confidence: f64,
    /// Date found in the document, if any.
    pub date: Option<NaiveDate>,
    /// Short human-readable summary.
    pub description: String,
    /// Free-form remarks from the model.
    pub notes: String,
}

/// A classification that could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationFailure {
    /// `error_<stem>` of the original file name.
    pub suggested_basename: String,
    /// Why classification failed.
    pub reason: String,
    /// Remarks shown alongside the failure.
    pub notes: String,
}

impl ClassificationFailure {
    /// Builds the failure record for `filename` after `error`.
    pub fn new(filename: &str, error: impl std::fmt::Display) -> Self {
        Self {
            suggested_basename: format!("error_{}", file_stem(filename)),
            reason: format!("Failed to process: {}", error),
            notes: "The AI model could not process this file.".to_string(),
        }
    }
}

/// The result of classifying one file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Classified(Classification),
    Failed(ClassificationFailure),
}

impl Outcome {
    /// The proposed basename, for both successes and failures.
    pub fn suggested_basename(&self) -> &str {
        match self {
            Outcome::Classified(c) => &c.suggested_basename,
            Outcome::Failed(f) => &f.suggested_basename,
        }
    }

    /// Returns `true` for [`Outcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Assigns a category and a filename to a document excerpt.
///
/// Implementations are shared across planner workers and must be thread-safe.
/// They own their retry policy and report exhaustion as [`Outcome::Failed`].
pub trait Classifier: Send + Sync {
    fn classify(&self, request: &ClassificationRequest<'_>) -> Outcome;
}

/// Errors from a single classification attempt.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The request never got a response (connection, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply had no message content.
    #[error("API returned an empty response")]
    EmptyResponse,

    /// The reply was not the expected JSON.
    #[error("invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClassifyError {
    /// Whether another attempt could succeed.
    ///
    /// Client errors other than timeouts, conflicts and rate limiting are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClassifyError::Status { status, .. } => {
                !(400..500).contains(status) || matches!(status, 408 | 409 | 429)
            }
            ClassifyError::Http(_) | ClassifyError::EmptyResponse | ClassifyError::Json(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_uses_error_stem() {
        let failure = ClassificationFailure::new("scan.final.pdf", "timeout");
        assert_eq!(failure.suggested_basename, "error_scan.final");
        assert_eq!(failure.reason, "Failed to process: timeout");
        assert_eq!(failure.notes, "The AI model could not process this file.");
    }

    #[test]
    fn test_status_retryability() {
        let status = |code| ClassifyError::Status {
            status: code,
            body: String::new(),
        };
        assert!(status(429).is_retryable());
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(408).is_retryable());
        assert!(!status(401).is_retryable());
        assert!(!status(400).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(ClassifyError::EmptyResponse.is_retryable());
    }

    #[test]
    fn test_outcome_accessors() {
        let failed = Outcome::Failed(ClassificationFailure::new("a.txt", "boom"));
        assert!(failed.is_failed());
        assert_eq!(failed.suggested_basename(), "error_a");
    }
}
