//! The `docsort` prelude for convenient library usage.
//!
//! This module re-exports the most commonly used types, traits, and functions
//! from the `docsort` library.
//!
//! # Example
//!
//! ```
//! use docsort::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let dir = tempfile::tempdir()?;
//!
//! // An empty directory plans without contacting the model.
//! let config = ConfigBuilder::new()
//!     .directory(dir.path().to_string_lossy())
//!     .build()?;
//! let token = CancellationToken::new();
//! let outcome = organize(&config, &token, None)?;
//! assert_eq!(outcome.num_files(), 0);
//! # Ok(())
//! # }
//! ```

pub use crate::applier::{Applier, ApplyReport, UndoReport};
pub use crate::cancellation::CancellationToken;
pub use crate::classifier::{
    Classification, ClassificationFailure, ClassificationRequest, Classifier, OpenAiClassifier,
    Outcome, RetryPolicy,
};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::core_types::{FileKind, FileRecord};
pub use crate::errors::{Error, Result};
pub use crate::extraction::{DocumentExtractor, ExtractError, Extractor};
pub use crate::plan::{AppliedEntry, PlanEntry};
pub use crate::planner::Planner;
pub use crate::progress::{NoOpProgress, ProgressReporter};
pub use crate::{apply_plan, build_plan, organize, undo_organization, Organized};
