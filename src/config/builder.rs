// src/config/builder.rs

use super::{
    parsing::{normalize_categories, parse_base_url, parse_max_size, require_positive},
    path_resolve::resolve_directory,
    ClassifierConfig, Config, OutputConfig, PlannerConfig,
};
use crate::cli::Cli;
use crate::constants::{
    API_KEY_ENV, AUDIT_LOG_FILENAME, BASE_URL_ENV, CLASSIFY_MAX_ATTEMPTS, CLASSIFY_TIMEOUT_SECS,
    DEFAULT_BASE_URL, DEFAULT_CATEGORIES, DEFAULT_MODEL, DEFAULT_WORKERS, MAX_CHARS_PER_FILE,
    MODEL_ENV,
};
use crate::core_types::FileKind;
use crate::errors::{ConfigError, Result};
use std::env;
use std::time::Duration;

/// A builder for creating a [`Config`] programmatically.
///
/// Every setting is optional. Unset values fall back to the environment
/// (`OPENAI_API_KEY`, `OPENAI_BASE_URL`, `DOCSORT_MODEL`) and then to the
/// crate defaults.
///
/// # Examples
///
/// ```
/// use docsort::ConfigBuilder;
///
/// # fn main() -> docsort::Result<()> {
/// let dir = tempfile::tempdir().unwrap();
/// let config = ConfigBuilder::new()
///     .directory(dir.path().to_str().unwrap())
///     .model("gpt-4o")
///     .workers(2)
///     .build()?;
///
/// assert_eq!(config.classifier.model, "gpt-4o");
/// assert_eq!(config.planner.workers, 2);
/// assert!(!config.apply);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    directory: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    categories: Option<Vec<String>>,
    workers: Option<usize>,
    max_chars: Option<usize>,
    max_size: Option<String>,
    max_attempts: Option<u32>,
    timeout_secs: Option<u64>,
    audit_log_name: Option<String>,
    apply: Option<bool>,
    json: Option<bool>,
}

impl ConfigBuilder {
    /// Creates a builder with every setting unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated from parsed command-line arguments.
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            directory: Some(cli.directory),
            model: cli.model,
            categories: cli.categories,
            workers: Some(cli.workers),
            max_chars: Some(cli.max_chars),
            max_size: cli.max_size,
            audit_log_name: cli.audit_log,
            apply: Some(cli.apply),
            json: Some(cli.json),
            ..Self::default()
        }
    }

    /// Sets the directory to organize. Defaults to the current directory.
    pub fn directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Sets the chat model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the API key, overriding the environment.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API endpoint root, overriding the environment.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the category vocabulary.
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Sets the number of planner workers.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the excerpt character budget.
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    /// Sets the maximum file size, in human-readable form (e.g., "20M").
    pub fn max_size(mut self, max_size: impl Into<String>) -> Self {
        self.max_size = Some(max_size.into());
        self
    }

    /// Sets the number of classification attempts per file.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the HTTP timeout for one classification request, in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Sets the audit log file name.
    pub fn audit_log_name(mut self, name: impl Into<String>) -> Self {
        self.audit_log_name = Some(name.into());
        self
    }

    /// Enables renaming after planning.
    pub fn apply(mut self, apply: bool) -> Self {
        self.apply = Some(apply);
        self
    }

    /// Prints the plan as JSON.
    pub fn json(mut self, json: bool) -> Self {
        self.json = Some(json);
        self
    }

    /// Validates the settings and builds the final [`Config`].
    ///
    /// # Errors
    /// Returns `Error::InvalidDirectory` if the directory cannot be resolved and
    /// `Error::Config` for any out-of-range or malformed value. A missing API key is
    /// not an error here; it is reported when the classifier is created.
    pub fn build(self) -> Result<Config> {
        let directory = resolve_directory(self.directory.as_deref().unwrap_or("."))?;

        let api_key = self
            .api_key
            .or_else(|| env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty());
        let base_url = parse_base_url(
            &self
                .base_url
                .or_else(|| env::var(BASE_URL_ENV).ok())
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;
        let model = self
            .model
            .or_else(|| env::var(MODEL_ENV).ok())
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let categories = match self.categories {
            Some(list) => normalize_categories(list)?,
            None => normalize_categories(DEFAULT_CATEGORIES.iter().copied())?,
        };
        let max_attempts = self.max_attempts.unwrap_or(CLASSIFY_MAX_ATTEMPTS);
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                option: "max attempts".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        let audit_log_name = self
            .audit_log_name
            .unwrap_or_else(|| AUDIT_LOG_FILENAME.to_string());
        validate_audit_log_name(&audit_log_name)?;

        Ok(Config {
            directory,
            classifier: ClassifierConfig {
                api_key,
                model,
                base_url,
                categories,
                max_attempts,
                timeout: Duration::from_secs(self.timeout_secs.unwrap_or(CLASSIFY_TIMEOUT_SECS)),
            },
            planner: PlannerConfig {
                workers: require_positive(self.workers.unwrap_or(DEFAULT_WORKERS), "--workers")?,
                max_excerpt_chars: require_positive(
                    self.max_chars.unwrap_or(MAX_CHARS_PER_FILE),
                    "--max-chars",
                )?,
                max_size: parse_max_size(self.max_size.as_deref())?,
            },
            audit_log_name,
            apply: self.apply.unwrap_or(false),
            output: OutputConfig {
                json: self.json.unwrap_or(false),
            },
        })
    }
}

/// The audit log must be a plain file name inside the organized directory, and
/// must not look like a document the planner would pick up.
fn validate_audit_log_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name == "."
        || name == "..";
    if invalid {
        return Err(ConfigError::InvalidValue {
            option: "--audit-log".to_string(),
            reason: format!("'{}' must be a plain file name", name),
        }
        .into());
    }
    if let Some((_, ext)) = name.rsplit_once('.') {
        if FileKind::from_extension(&format!(".{}", ext.to_lowercase())).is_some() {
            return Err(ConfigError::InvalidValue {
                option: "--audit-log".to_string(),
                reason: format!("'{}' has a document extension and would be organized", name),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_basic_config_creation() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let config = ConfigBuilder::new()
            .directory(temp.path().to_str().unwrap())
            .api_key("sk-test")
            .build()?;
        assert!(config.directory.is_absolute());
        assert_eq!(config.planner.workers, DEFAULT_WORKERS);
        assert_eq!(config.planner.max_excerpt_chars, MAX_CHARS_PER_FILE);
        assert_eq!(config.audit_log_name, AUDIT_LOG_FILENAME);
        assert_eq!(config.classifier.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.classifier.categories.len(), DEFAULT_CATEGORIES.len());
        assert!(!config.apply);
        Ok(())
    }

    #[test]
    fn test_from_cli_carries_flags() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let dir = temp.path().to_str().unwrap();
        let cli = Cli::parse_from([
            "docsort",
            dir,
            "--apply",
            "-w",
            "2",
            "--max-chars",
            "100",
            "--categories",
            "invoice,receipt",
        ]);
        let config = ConfigBuilder::from_cli(cli).build()?;
        assert!(config.apply);
        assert_eq!(config.planner.workers, 2);
        assert_eq!(config.planner.max_excerpt_chars, 100);
        assert_eq!(config.classifier.categories, vec!["invoice", "receipt", "other"]);
        Ok(())
    }

    #[test]
    fn test_zero_workers_rejected() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let result = ConfigBuilder::new()
            .directory(temp.path().to_str().unwrap())
            .workers(0)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn test_audit_log_name_must_be_plain() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let result = ConfigBuilder::new()
            .directory(temp.path().to_str().unwrap())
            .audit_log_name("../escape.json")
            .build();
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_audit_log_name_with_document_extension_rejected() -> anyhow::Result<()> {
        let temp = tempdir()?;
        for name in ["notes.txt", "LOG.MD", "scan.pdf"] {
            let result = ConfigBuilder::new()
                .directory(temp.path().to_str().unwrap())
                .audit_log_name(name)
                .build();
            assert!(matches!(result, Err(Error::Config(_))), "'{}' was accepted", name);
        }
        let config = ConfigBuilder::new()
            .directory(temp.path().to_str().unwrap())
            .audit_log_name("moves.log")
            .build()?;
        assert_eq!(config.audit_log_name, "moves.log");
        Ok(())
    }

    #[test]
    fn test_reserved_error_category_rejected() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let result = ConfigBuilder::new()
            .directory(temp.path().to_str().unwrap())
            .categories(vec!["error".to_string(), "invoice".to_string()])
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_invalid() {
        let result = ConfigBuilder::new()
            .directory("definitely/not/a/real/dir/for/docsort")
            .build();
        assert!(matches!(result, Err(Error::InvalidDirectory(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let config = ConfigBuilder::new()
            .directory(temp.path().to_str().unwrap())
            .api_key("sk-very-secret")
            .build()?;
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
        Ok(())
    }
}
