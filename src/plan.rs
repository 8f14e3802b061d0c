//! Plan entries and their applied counterparts.
//!
//! A [`PlanEntry`] is what the planner proposes for one file. An
//! [`AppliedEntry`] is the same entry after the applier ran, carrying the path
//! the file actually ended up at. Both serialize to the flat record format of
//! the audit log, where a failed classification appears as `"category": "error"`.

use crate::classifier::{Classification, ClassificationFailure, Outcome};
use crate::constants::ERROR_CATEGORY;
use crate::core_types::FileRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The proposed action for one file.
///
/// # Examples
///
/// ```
/// use docsort::classifier::{Classification, Outcome};
/// use docsort::core_types::FileRecord;
/// use docsort::PlanEntry;
/// use std::path::{Path, PathBuf};
///
/// let dir = Path::new("/docs");
/// let file = FileRecord {
///     path: dir.join("scan.pdf"),
///     name: "scan.pdf".to_string(),
///     extension: ".pdf".to_string(),
///     size: 10,
///     modified: None,
/// };
/// let outcome = Outcome::Classified(Classification {
///     category: "invoice".to_string(),
///     suggested_basename: "invoice_2025-11-09".to_string(),
///     confidence: 0.9,
///     date: None,
///     description: String::new(),
///     notes: String::new(),
/// });
///
/// let entry = PlanEntry::new(dir, &file, outcome);
/// assert_eq!(entry.suggested_new_name, "invoice_2025-11-09.pdf");
/// assert_eq!(entry.suggested_new_path, PathBuf::from("/docs/invoice/invoice_2025-11-09.pdf"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlanRecord", into = "PlanRecord")]
pub struct PlanEntry {
    pub old_path: PathBuf,
    pub old_name: String,
    pub extension: String,
    pub outcome: Outcome,
    pub suggested_new_name: String,
    pub suggested_new_path: PathBuf,
}

impl PlanEntry {
    /// Builds the entry for `file` inside `directory` from a classifier outcome.
    ///
    /// The file is placed in a subfolder named after the sanitized category, or
    /// directly in `directory` when the category sanitizes to nothing.
    pub fn new(directory: &Path, file: &FileRecord, outcome: Outcome) -> Self {
        let basename = outcome.suggested_basename().replace(['/', '\\'], "_");
        let suggested_new_name = format!("{}{}", basename, file.extension);
        let folder = sanitize_category(category_of(&outcome));
        let suggested_new_path = if folder.is_empty() {
            directory.join(&suggested_new_name)
        } else {
            directory.join(folder).join(&suggested_new_name)
        };

        Self {
            old_path: file.path.clone(),
            old_name: file.name.clone(),
            extension: file.extension.clone(),
            outcome,
            suggested_new_name,
            suggested_new_path,
        }
    }

    /// The category as written to the audit log; `"error"` for failures.
    pub fn category(&self) -> &str {
        category_of(&self.outcome)
    }

    pub fn suggested_basename(&self) -> &str {
        self.outcome.suggested_basename()
    }

    /// Confidence of the classification; 0.0 for failures.
    pub fn confidence(&self) -> f64 {
        match &self.outcome {
            Outcome::Classified(c) => c.confidence,
            Outcome::Failed(_) => 0.0,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match &self.outcome {
            Outcome::Classified(c) => c.date,
            Outcome::Failed(_) => None,
        }
    }

    /// The summary, or the failure reason.
    pub fn description(&self) -> &str {
        match &self.outcome {
            Outcome::Classified(c) => &c.description,
            Outcome::Failed(f) => &f.reason,
        }
    }

    pub fn notes(&self) -> &str {
        match &self.outcome {
            Outcome::Classified(c) => &c.notes,
            Outcome::Failed(f) => &f.notes,
        }
    }

    /// Failed entries stay in the plan but are never renamed.
    pub fn is_failed(&self) -> bool {
        self.outcome.is_failed()
    }
}

fn category_of(outcome: &Outcome) -> &str {
    match outcome {
        Outcome::Classified(c) => &c.category,
        Outcome::Failed(_) => ERROR_CATEGORY,
    }
}

/// Reduces a category to a safe folder name.
///
/// Path separators become `_`, then everything except alphanumerics and `_` is
/// dropped and surrounding underscores are trimmed. An empty result means the
/// file stays in the top-level directory.
///
/// ```
/// use docsort::plan::sanitize_category;
///
/// assert_eq!(sanitize_category("tax/2024"), "tax_2024");
/// assert_eq!(sanitize_category(" Medical Bills "), "MedicalBills");
/// assert_eq!(sanitize_category("../"), "");
/// ```
pub fn sanitize_category(category: &str) -> String {
    let replaced = category.replace(['/', '\\'], "_");
    let kept: String = replaced
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    kept.trim_matches('_').to_string()
}

/// A plan entry after the applier ran.
///
/// `final_new_path` differs from `suggested_new_path` when a collision suffix
/// was added, and equals `old_path` when the file was not moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedEntry {
    #[serde(flatten)]
    pub entry: PlanEntry,
    pub final_new_path: PathBuf,
    pub final_new_name: String,
}

impl AppliedEntry {
    /// Whether the file was moved away from its original location.
    pub fn was_moved(&self) -> bool {
        self.entry.old_path != self.final_new_path
    }
}

/// The flat record format shared by the audit log, JSON output and web API.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlanRecord {
    old_path: PathBuf,
    old_name: String,
    #[serde(default)]
    extension: String,
    #[serde(default)]
    suggested_basename: String,
    #[serde(default)]
    suggested_new_name: String,
    #[serde(default)]
    suggested_new_path: PathBuf,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl From<PlanEntry> for PlanRecord {
    fn from(entry: PlanEntry) -> Self {
        let category = entry.category().to_string();
        let (suggested_basename, confidence, date, description, notes) = match entry.outcome {
            Outcome::Classified(c) => (
                c.suggested_basename,
                Some(c.confidence),
                c.date.map(|d| d.format("%Y-%m-%d").to_string()),
                c.description,
                c.notes,
            ),
            Outcome::Failed(f) => (f.suggested_basename, Some(0.0), None, f.reason, f.notes),
        };
        Self {
            old_path: entry.old_path,
            old_name: entry.old_name,
            extension: entry.extension,
            suggested_basename,
            suggested_new_name: entry.suggested_new_name,
            suggested_new_path: entry.suggested_new_path,
            category: Some(category),
            confidence,
            date,
            description: Some(description),
            notes: Some(notes),
        }
    }
}

impl From<PlanRecord> for PlanEntry {
    fn from(record: PlanRecord) -> Self {
        let outcome = if record.category.as_deref() == Some(ERROR_CATEGORY) {
            Outcome::Failed(ClassificationFailure {
                suggested_basename: record.suggested_basename,
                reason: record.description.unwrap_or_default(),
                notes: record.notes.unwrap_or_default(),
            })
        } else {
            Outcome::Classified(Classification {
                category: record.category.unwrap_or_default(),
                suggested_basename: record.suggested_basename,
                confidence: record.confidence.unwrap_or(0.0),
                date: record
                    .date
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
                description: record.description.unwrap_or_default(),
                notes: record.notes.unwrap_or_default(),
            })
        };
        Self {
            old_path: record.old_path,
            old_name: record.old_name,
            extension: record.extension,
            outcome,
            suggested_new_name: record.suggested_new_name,
            suggested_new_path: record.suggested_new_path,
        }
    }
}
