//! `docsort` is a library and command-line tool that organizes a folder of
//! documents with the help of a language model.
//!
//! Every supported file directly inside the target directory is read, a short
//! text excerpt is sent to an OpenAI-compatible chat endpoint, and the model
//! proposes a category and a descriptive file name. The library works in three
//! stages:
//! 1.  **Plan**: List the files and classify them in parallel. Nothing on disk changes.
//! 2.  **Apply**: Move each file into `<directory>/<category>/<new name>`, never
//!     overwriting an existing file, and record every move in a JSON audit log.
//! 3.  **Undo**: Read the audit log back and restore the original layout.
//!
//! # Example: Library Usage
//!
//! The planner takes any `Extractor` and `Classifier`, so it can run without a
//! network connection:
//!
//! ```
//! use docsort::classifier::{Classification, ClassificationRequest, Classifier, Outcome};
//! use docsort::extraction::DocumentExtractor;
//! use docsort::{Applier, CancellationToken, ConfigBuilder, Planner};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! struct Receipts;
//!
//! impl Classifier for Receipts {
//!     fn classify(&self, request: &ClassificationRequest<'_>) -> Outcome {
//!         Outcome::Classified(Classification {
//!             category: "receipt".to_string(),
//!             suggested_basename: format!("receipt_{}", request.excerpt.trim()),
//!             confidence: 0.9,
//!             date: None,
//!             description: String::new(),
//!             notes: String::new(),
//!         })
//!     }
//! }
//!
//! let temp_dir = tempdir().unwrap();
//! fs::write(temp_dir.path().join("scan.txt"), "coffee").unwrap();
//!
//! let config = ConfigBuilder::new()
//!     .directory(temp_dir.path().to_str().unwrap())
//!     .build()
//!     .unwrap();
//! let extractor = DocumentExtractor::new(config.planner.max_excerpt_chars);
//! let planner = Planner::new(&extractor, &Receipts, config.planner);
//!
//! // 1. Plan.
//! let plan = planner
//!     .build_plan(&config.directory, &CancellationToken::new())
//!     .unwrap();
//! assert_eq!(plan[0].suggested_new_name, "receipt_coffee.txt");
//!
//! // 2. Apply and record.
//! let applier = Applier::new();
//! let report = applier
//!     .apply_and_record(&config.directory, &config.audit_log_name, plan)
//!     .unwrap();
//! assert!(temp_dir.path().join("receipt/receipt_coffee.txt").exists());
//!
//! // 3. Undo.
//! let undo = applier
//!     .undo_organization(&config.directory, &config.audit_log_name)
//!     .unwrap();
//! assert_eq!(undo.files_restored, report.files_moved());
//! assert!(temp_dir.path().join("scan.txt").exists());
//! ```

pub mod applier;
pub mod cancellation;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core_types;
pub mod discovery;
pub mod errors;
pub mod extraction;
pub mod output;
pub mod plan;
pub mod planner;
pub mod prelude;
pub mod progress;
pub mod signal;
#[cfg(feature = "web")]
pub mod web;

// Re-export key public types for easier use as a library
pub use applier::{Applier, ApplyReport, UndoReport};
pub use cancellation::CancellationToken;
pub use config::{Config, ConfigBuilder};
pub use errors::{Error, Result};
pub use plan::{AppliedEntry, PlanEntry};
pub use planner::Planner;

use crate::classifier::OpenAiClassifier;
use crate::discovery::list_files;
use crate::extraction::DocumentExtractor;
use crate::progress::ProgressReporter;
use std::path::Path;
use std::sync::Arc;

/// The result of a complete organize run.
#[derive(Debug)]
pub enum Organized {
    /// The plan was built but nothing on disk changed.
    DryRun(Vec<PlanEntry>),
    /// The plan was applied.
    Applied(ApplyReport),
}

impl Organized {
    /// Number of files that received a plan entry.
    pub fn num_files(&self) -> usize {
        match self {
            Organized::DryRun(plan) => plan.len(),
            Organized::Applied(report) => report.entries.len(),
        }
    }
}

/// Builds the rename plan for `config.directory` without touching the filesystem.
///
/// The directory is listed first; the OpenAI client is only constructed when
/// there is at least one supported file, so an empty directory plans without
/// credentials.
///
/// # Errors
/// Returns `Error::InvalidDirectory` if the directory cannot be listed,
/// `Error::Config` if the classifier lacks credentials, and `Error::Interrupted`
/// if `token` is cancelled.
pub fn build_plan(
    config: &Config,
    token: &CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
) -> Result<Vec<PlanEntry>> {
    let files = list_files(&config.directory, config.planner.max_size, token)?;
    if !files.iter().any(|f| f.kind().is_some()) {
        log::info!(
            "No supported files found in '{}'.",
            config.directory.display()
        );
        return Ok(Vec::new());
    }

    let classifier = OpenAiClassifier::from_config(&config.classifier)?;
    let extractor = DocumentExtractor::new(config.planner.max_excerpt_chars);
    Planner::new(&extractor, &classifier, config.planner)
        .with_progress(progress)
        .plan_files(&config.directory, files, token)
}

/// Applies `plan` inside `config.directory` and writes the audit log.
pub fn apply_plan(config: &Config, plan: Vec<PlanEntry>) -> Result<ApplyReport> {
    Applier::new().apply_and_record(&config.directory, &config.audit_log_name, plan)
}

/// Restores the layout recorded in the audit log of `directory`.
///
/// # Errors
/// Returns `Error::AuditLogNotFound` when there is nothing to undo.
pub fn undo_organization(directory: &Path, audit_log_name: &str) -> Result<UndoReport> {
    Applier::new().undo_organization(directory, audit_log_name)
}

/// Plans `config.directory` and, when `config.apply` is set, applies the plan.
///
/// This mirrors the command-line run. For finer control, such as showing the
/// plan before confirming, call `build_plan` and `apply_plan` separately.
pub fn organize(
    config: &Config,
    token: &CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
) -> Result<Organized> {
    let plan = build_plan(config, token, progress)?;
    if !config.apply {
        return Ok(Organized::DryRun(plan));
    }
    token.check()?;
    Ok(Organized::Applied(apply_plan(config, plan)?))
}
