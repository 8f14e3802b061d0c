//! Builds a rename plan by classifying every file of a directory concurrently.

use crate::cancellation::CancellationToken;
use crate::classifier::{ClassificationRequest, Classifier};
use crate::config::PlannerConfig;
use crate::core_types::{FileKind, FileRecord};
use crate::discovery::list_files;
use crate::errors::{Error, Result};
use crate::extraction::{truncate_chars, ExtractError, Extractor};
use crate::plan::PlanEntry;
use crate::progress::ProgressReporter;
use crossbeam_channel::unbounded;
use log::{debug, error, info};
use rayon::ThreadPoolBuilder;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Span;

/// Turns a directory listing into a list of [`PlanEntry`] values.
///
/// Every file runs through extraction and classification on a fixed-size worker
/// pool. A file whose processing fails or panics is logged and left out of the
/// plan; it never aborts the batch. Entries come back in completion order.
/// Planning reads files but never creates, renames or deletes anything.
///
/// # Examples
///
/// ```
/// use docsort::classifier::{Classification, ClassificationRequest, Classifier, Outcome};
/// use docsort::config::PlannerConfig;
/// use docsort::extraction::DocumentExtractor;
/// use docsort::{CancellationToken, Planner};
/// use std::fs;
///
/// struct Everything;
///
/// impl Classifier for Everything {
///     fn classify(&self, _request: &ClassificationRequest<'_>) -> Outcome {
///         Outcome::Classified(Classification {
///             category: "other".to_string(),
///             suggested_basename: "note".to_string(),
///             confidence: 1.0,
///             date: None,
///             description: String::new(),
///             notes: String::new(),
///         })
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// fs::write(dir.path().join("todo.txt"), "buy milk")?;
///
/// let extractor = DocumentExtractor::default();
/// let options = PlannerConfig { workers: 2, max_excerpt_chars: 100, max_size: None };
/// let planner = Planner::new(&extractor, &Everything, options);
/// let plan = planner.build_plan(dir.path(), &CancellationToken::new())?;
///
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan[0].suggested_new_name, "note.txt");
/// # Ok(())
/// # }
/// ```
pub struct Planner<'a> {
    extractor: &'a dyn Extractor,
    classifier: &'a dyn Classifier,
    options: PlannerConfig,
    progress: Option<Arc<dyn ProgressReporter>>,
    span: Span,
}

impl<'a> Planner<'a> {
    pub fn new(
        extractor: &'a dyn Extractor,
        classifier: &'a dyn Classifier,
        options: PlannerConfig,
    ) -> Self {
        Self {
            extractor,
            classifier,
            options,
            progress: None,
            span: tracing::info_span!("planner"),
        }
    }

    /// Reports per-file progress to `progress`.
    pub fn with_progress(mut self, progress: Option<Arc<dyn ProgressReporter>>) -> Self {
        self.progress = progress;
        self
    }

    /// Runs every worker inside `span`, so their log events carry its fields.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Lists `directory` and plans every eligible file in it.
    ///
    /// # Errors
    /// Returns `Error::InvalidDirectory` if the directory cannot be listed,
    /// `Error::WorkerPool` if the pool cannot start and `Error::Interrupted` if
    /// the token is cancelled.
    pub fn build_plan(
        &self,
        directory: &Path,
        token: &CancellationToken,
    ) -> Result<Vec<PlanEntry>> {
        let files = list_files(directory, self.options.max_size, token)?;
        self.plan_files(directory, files, token)
    }

    /// Plans an already listed set of files of `directory`.
    pub fn plan_files(
        &self,
        directory: &Path,
        files: Vec<FileRecord>,
        token: &CancellationToken,
    ) -> Result<Vec<PlanEntry>> {
        let _entered = self.span.enter();
        token.check()?;

        let files = self.dispatchable(files);
        if files.is_empty() {
            info!("No supported files to process.");
            return Ok(Vec::new());
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.workers)
            .thread_name(|i| format!("docsort-planner-{}", i))
            .build()?;
        debug!(
            "Dispatching {} file(s) to {} worker(s).",
            files.len(),
            self.options.workers
        );

        if let Some(p) = &self.progress {
            p.set_length(files.len() as u64);
        }

        let (tx, rx) = unbounded();
        let finished = AtomicUsize::new(0);

        pool.scope(|scope| {
            for file in &files {
                let tx = tx.clone();
                let finished = &finished;
                scope.spawn(move |_| {
                    if token.is_cancelled() {
                        return;
                    }
                    let _entered = self.span.enter();

                    match catch_unwind(AssertUnwindSafe(|| self.process_file(directory, file))) {
                        Ok(Ok(Some(entry))) => {
                            if tx.send(entry).is_err() {
                                error!("Plan collector dropped; discarding '{}'.", file.name);
                            }
                        }
                        Ok(Ok(None)) => {}
                        Ok(Err(e)) => error!("Exception processing file '{}': {}", file.name, e),
                        Err(_) => error!("Worker panicked while processing '{}'.", file.name),
                    }

                    let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = &self.progress {
                        p.set_position(done as u64);
                        p.set_message(file.name.clone());
                    }
                });
            }
        });
        drop(tx);

        if token.is_cancelled() {
            if let Some(p) = &self.progress {
                p.finish();
            }
            return Err(Error::Interrupted);
        }

        let plan: Vec<PlanEntry> = rx.into_iter().collect();
        if let Some(p) = &self.progress {
            p.finish_with_message(format!("Planned {} file(s)", plan.len()));
        }
        info!("Plan complete: {} of {} file(s).", plan.len(), files.len());
        Ok(plan)
    }

    /// Drops unsupported files and, when OCR is unavailable, image files.
    fn dispatchable(&self, files: Vec<FileRecord>) -> Vec<FileRecord> {
        let mut supported: Vec<FileRecord> = files
            .into_iter()
            .filter(|f| {
                let routed = f.kind().is_some();
                if !routed {
                    info!("Skipping file with unhandled extension: {}", f.name);
                }
                routed
            })
            .collect();

        if supported.iter().any(|f| f.kind() == Some(FileKind::Image)) {
            if let Err(e) = self.extractor.ocr_available() {
                error!("{}. Image files will be skipped.", e);
                supported.retain(|f| f.kind() != Some(FileKind::Image));
            }
        }
        supported
    }

    fn process_file(
        &self,
        directory: &Path,
        file: &FileRecord,
    ) -> std::result::Result<Option<PlanEntry>, ExtractError> {
        let Some(kind) = file.kind() else {
            return Ok(None);
        };

        let text = match self.extractor.extract(&file.path, kind) {
            Ok(text) => text,
            Err(e @ ExtractError::OcrUnavailable(_)) => return Err(e),
            Err(e) => {
                error!("Error extracting text from '{}': {}", file.name, e);
                format!("Error reading file content: {}", e)
            }
        };
        let excerpt = truncate_chars(&text, self.options.max_excerpt_chars);

        let outcome = self.classifier.classify(&ClassificationRequest {
            filename: &file.name,
            extension: &file.extension,
            excerpt,
        });
        Ok(Some(PlanEntry::new(directory, file, outcome)))
    }
}
