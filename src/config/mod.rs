//! Defines the core `Config` struct and related types for application configuration.
//!
//! Settings come from the CLI, the web UI, or programmatic use through
//! [`ConfigBuilder`], with the API key and endpoint falling back to the
//! environment (`.env` is loaded by the binary before the builder runs).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub use builder::ConfigBuilder;
mod builder;
mod parsing;
pub mod path_resolve;

pub use path_resolve::resolve_directory;

/// Settings for the language model classifier.
#[derive(Clone)]
pub struct ClassifierConfig {
    /// API key for the chat completions endpoint. Checked when the classifier is built.
    pub api_key: Option<String>,
    /// Model name sent with each request.
    pub model: String,
    /// Endpoint root; `chat/completions` is joined onto it.
    pub base_url: Url,
    /// Closed category vocabulary offered to the model. Always contains `other`.
    pub categories: Vec<String>,
    /// Attempts per file before the entry is marked as failed.
    pub max_attempts: u32,
    /// HTTP timeout for one request.
    pub timeout: Duration,
}

// The API key never appears in debug output.
impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("categories", &self.categories)
            .field("max_attempts", &self.max_attempts)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for the planning phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Size of the worker pool.
    pub workers: usize,
    /// Character budget for the excerpt sent to the classifier.
    pub max_excerpt_chars: usize,
    /// Files larger than this many bytes are not listed.
    pub max_size: Option<u128>,
}

/// Settings for the human-facing output of the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Print the plan as JSON instead of a table.
    pub json: bool,
}

/// Fully validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// The canonicalized directory being organized.
    pub directory: PathBuf,
    /// Configuration for the classifier.
    pub classifier: ClassifierConfig,
    /// Configuration for the planner.
    pub planner: PlannerConfig,
    /// File name of the audit log inside `directory`.
    pub audit_log_name: String,
    /// If `true`, rename files after planning. Otherwise the run is a dry run.
    pub apply: bool,
    /// Configuration for CLI output.
    pub output: OutputConfig,
}

/// Joins an audit log file name onto the organized directory.
pub fn audit_log_path(directory: &Path, audit_log_name: &str) -> PathBuf {
    directory.join(audit_log_name)
}
