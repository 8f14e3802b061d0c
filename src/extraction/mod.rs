//! Reads a short text excerpt out of each supported document type.
//!
//! [`Extractor`] is the seam the planner depends on. [`DocumentExtractor`] is the
//! production implementation: PDF through `pdf-extract`, Word documents through
//! `docx-rs`, images through the external `tesseract` binary and plain text read
//! directly. Parser failures degrade to an empty excerpt; only I/O failures and a
//! missing OCR engine are reported as errors.

use crate::constants::MAX_CHARS_PER_FILE;
use crate::core_types::FileKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod docx;
mod ocr;
mod pdf;
mod text;

/// Errors an extractor reports instead of degrading to empty text.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file could not be opened or read.
    #[error("I/O error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OCR engine is not installed or cannot be started.
    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),
}

impl ExtractError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Produces plain text from a document.
pub trait Extractor: Send + Sync {
    /// Extracts the text of `path`, read as `kind`.
    ///
    /// Implementations should return an empty string for documents they can open
    /// but not interpret.
    fn extract(&self, path: &Path, kind: FileKind) -> Result<String, ExtractError>;

    /// Checks once, before any image is dispatched, whether OCR can run.
    fn ocr_available(&self) -> Result<(), ExtractError> {
        Ok(())
    }
}

/// The default extractor for PDF, DOCX, image and plain text files.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    max_chars: usize,
    tesseract: PathBuf,
}

impl DocumentExtractor {
    /// Creates an extractor that reads at most `max_chars` characters of plain text.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            tesseract: PathBuf::from("tesseract"),
        }
    }

    /// Uses a specific `tesseract` binary instead of the one on `PATH`.
    pub fn with_tesseract(mut self, binary: impl Into<PathBuf>) -> Self {
        self.tesseract = binary.into();
        self
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(MAX_CHARS_PER_FILE)
    }
}

impl Extractor for DocumentExtractor {
    fn extract(&self, path: &Path, kind: FileKind) -> Result<String, ExtractError> {
        match kind {
            FileKind::Pdf => pdf::extract(path),
            FileKind::Docx => docx::extract(path),
            FileKind::Image => ocr::extract(&self.tesseract, path),
            FileKind::Text => text::extract(path, self.max_chars),
        }
    }

    fn ocr_available(&self) -> Result<(), ExtractError> {
        ocr::check_available(&self.tesseract)
    }
}

/// Returns the first `max_chars` characters of `text`.
///
/// Counts `char`s, so a multi-byte code point is never split.
///
/// ```
/// use docsort::extraction::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("short", 100), "short");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
