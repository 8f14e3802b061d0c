//! Executes a plan on disk and reverses it from the audit log.
//!
//! Apply and undo run sequentially on the calling thread and always run to the
//! end once started, so the audit log matches the renames that happened.

use crate::config::audit_log_path;
use crate::errors::Result;
use crate::plan::{AppliedEntry, PlanEntry};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Span;

mod audit_log;
mod rename;

use audit_log::check_log_target;
pub use audit_log::{read_audit_log, write_audit_log};
pub use rename::rename_with_collision;

/// The outcome of applying a plan and recording it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyReport {
    /// One entry per plan entry, in plan order.
    pub entries: Vec<AppliedEntry>,
    /// Where the audit log was written; `None` for an empty plan.
    pub audit_log: Option<PathBuf>,
}

impl ApplyReport {
    /// Number of files that were moved.
    pub fn files_moved(&self) -> usize {
        self.entries.iter().filter(|e| e.was_moved()).count()
    }
}

/// The outcome of an undo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoReport {
    /// The log was read and every record was processed.
    pub undo_successful: bool,
    /// Files moved back to their original path.
    pub files_restored: usize,
    /// Records whose file was no longer at its recorded location.
    pub files_skipped: usize,
    /// Files that were found but could not be moved back.
    pub files_failed: usize,
}

/// Renames files according to a plan and undoes it later.
///
/// # Examples
///
/// ```
/// use docsort::Applier;
/// use std::fs;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let applier = Applier::new();
///
/// // An empty plan changes nothing and writes no log.
/// let report = applier.apply_and_record(dir.path(), "metadata.json", Vec::new())?;
/// assert!(report.entries.is_empty());
/// assert!(!dir.path().join("metadata.json").exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Applier {
    span: Span,
}

impl Default for Applier {
    fn default() -> Self {
        Self::new()
    }
}

impl Applier {
    pub fn new() -> Self {
        Self {
            span: tracing::info_span!("applier"),
        }
    }

    /// Runs every rename inside `span`.
    pub fn with_span(span: Span) -> Self {
        Self { span }
    }

    /// Renames every non-failed entry, in order.
    ///
    /// Failed entries keep their original location. The result has the same
    /// length and order as `plan`.
    pub fn apply_plan(&self, plan: Vec<PlanEntry>) -> Vec<AppliedEntry> {
        let _entered = self.span.enter();
        if plan.is_empty() {
            warn!("Plan is empty. Nothing to apply.");
            return Vec::new();
        }

        plan.into_iter()
            .map(|entry| {
                if entry.is_failed() {
                    debug!("Leaving '{}' in place (classification failed).", entry.old_name);
                    return AppliedEntry {
                        final_new_path: entry.old_path.clone(),
                        final_new_name: entry.old_name.clone(),
                        entry,
                    };
                }
                let final_new_path =
                    rename_with_collision(&entry.old_path, &entry.suggested_new_path);
                let final_new_name = final_new_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| entry.old_name.clone());
                AppliedEntry {
                    entry,
                    final_new_path,
                    final_new_name,
                }
            })
            .collect()
    }

    /// Applies `plan` and writes the audit log into `directory` once, at the end.
    ///
    /// No log is written for an empty plan. Nothing is moved when the log name
    /// points at a file that is not an earlier audit log.
    pub fn apply_and_record(
        &self,
        directory: &Path,
        audit_log_name: &str,
        plan: Vec<PlanEntry>,
    ) -> Result<ApplyReport> {
        if plan.is_empty() {
            return Ok(ApplyReport {
                entries: self.apply_plan(plan),
                audit_log: None,
            });
        }

        let path = audit_log_path(directory, audit_log_name);
        check_log_target(&path)?;
        let entries = self.apply_plan(plan);

        let _entered = self.span.enter();
        write_audit_log(&path, &entries)?;
        Ok(ApplyReport {
            entries,
            audit_log: Some(path),
        })
    }

    /// Moves every recorded file from `final_new_path` back to `old_path`.
    ///
    /// Records that were never moved are skipped silently; records whose file is
    /// gone are skipped with a warning. Category folders directly inside
    /// `directory` that end up empty are removed. The log itself is kept.
    ///
    /// # Errors
    /// `Error::AuditLogNotFound` or `Error::AuditLogCorrupt` when the log cannot
    /// be used.
    pub fn undo_organization(&self, directory: &Path, audit_log_name: &str) -> Result<UndoReport> {
        let _entered = self.span.enter();
        let log_path = audit_log_path(directory, audit_log_name);
        let records = read_audit_log(&log_path)?;
        info!(
            "Undoing {} record(s) from '{}'",
            records.len(),
            log_path.display()
        );

        let mut report = UndoReport::default();
        let mut vacated = BTreeSet::new();

        for record in &records {
            if !record.was_moved() {
                continue;
            }
            let current = &record.final_new_path;
            if fs::symlink_metadata(current).is_err() {
                warn!(
                    "Cannot restore '{}': '{}' no longer exists.",
                    record.entry.old_name,
                    current.display()
                );
                report.files_skipped += 1;
                continue;
            }

            let restored = rename_with_collision(current, &record.entry.old_path);
            if restored == *current {
                report.files_failed += 1;
                continue;
            }
            if restored != record.entry.old_path {
                warn!(
                    "'{}' was occupied; restored to '{}' instead.",
                    record.entry.old_path.display(),
                    restored.display()
                );
            }
            report.files_restored += 1;
            if let Some(parent) = current.parent() {
                vacated.insert(parent.to_path_buf());
            }
        }

        remove_empty_category_dirs(directory, &vacated);
        report.undo_successful = true;
        info!(
            "Undo complete: {} restored, {} skipped, {} failed.",
            report.files_restored, report.files_skipped, report.files_failed
        );
        Ok(report)
    }
}

/// Removes folders left empty by an undo, limited to direct children of `directory`.
fn remove_empty_category_dirs(directory: &Path, vacated: &BTreeSet<PathBuf>) {
    for dir in vacated {
        if dir.parent() != Some(directory) {
            continue;
        }
        let is_empty = fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if is_empty {
            match fs::remove_dir(dir) {
                Ok(()) => debug!("Removed empty folder '{}'", dir.display()),
                Err(e) => warn!("Could not remove empty folder '{}': {}", dir.display(), e),
            }
        }
    }
}
