//! Defines application-specific error types.
//!
//! The `Error` enum categorizes the failures that abort a whole operation
//! (precondition failures, audit log problems, cancellation). Per-file problems
//! never surface here: extraction and classification failures degrade into the
//! plan itself, and rename failures are logged and treated as no-ops.

use std::path::PathBuf;
use thiserror::Error;

/// Application-specific errors used throughout `docsort`.
#[derive(Error, Debug)]
pub enum Error {
    // --- I/O Errors ---
    /// Error occurring during file or directory access (read, write, metadata).
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    // --- Preconditions ---
    /// Invalid configuration settings or combinations, including a missing API key.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The path given for organization does not exist or is not a directory.
    #[error("Directory not found or not a directory: '{}'", .0.display())]
    InvalidDirectory(PathBuf),

    /// The planner's worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The HTTP client for the classifier could not be created.
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    // --- Audit Log ---
    /// Undo was requested but no audit log exists in the directory.
    #[error("No audit log found at '{}'. Nothing to undo.", .0.display())]
    AuditLogNotFound(PathBuf),

    /// The audit log exists but could not be parsed.
    #[error("Audit log at '{}' is malformed: {source}", .path.display())]
    AuditLogCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The audit log name points at a file that is not an audit log.
    #[error("Refusing to overwrite '{}': it is not a docsort audit log", .0.display())]
    AuditLogConflict(PathBuf),

    /// The audit log could not be serialized.
    #[error("Failed to serialize audit log: {0}")]
    Serialize(#[source] serde_json::Error),

    // --- Signal Handling ---
    /// Error indicating that the operation was cancelled by the user (e.g., Ctrl+C).
    #[error("Operation cancelled by user (Ctrl+C)")]
    Interrupted,
}

/// Errors raised while validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An option was given a value outside its accepted range or format.
    #[error("Invalid value for {option}: {reason}")]
    InvalidValue { option: String, reason: String },

    /// A credential required by the classifier is not set.
    #[error("{0} is not set. Create a .env file with your key, or set the environment variable directly.")]
    MissingCredential(String),
}

/// A `Result` alias using the crate's `Error` type.
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create an `Error::Io` with path context.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io, path::PathBuf};

    #[test]
    fn test_io_error_with_path_helper() {
        let path = PathBuf::from("some/test/path.txt");
        let source_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = io_error_with_path(source_error, &path);

        match app_error {
            Error::Io {
                path: error_path,
                source,
            } => {
                assert!(error_path.contains("some/test/path.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Error::Io"),
        }
    }

    #[test]
    fn test_missing_credential_message_names_variable() {
        let err: Error = ConfigError::MissingCredential("OPENAI_API_KEY".to_string()).into();
        let msg = err.to_string();
        assert!(msg.starts_with("OPENAI_API_KEY is not set"));
    }

    #[test]
    fn test_audit_log_not_found_message() {
        let err = Error::AuditLogNotFound(PathBuf::from("/tmp/docs/metadata.json"));
        assert!(err.to_string().contains("/tmp/docs/metadata.json"));
        assert!(err.to_string().contains("Nothing to undo"));
    }
}
