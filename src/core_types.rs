//! Defines the file-level data structures produced by discovery.
//!
//! `FileRecord` describes one file found in the directory being organized and
//! `FileKind` decides which extractor reads it.

use crate::constants::{IMAGE_EXTENSIONS, TEXT_EXTENSIONS};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// A file discovered in the directory being organized.
///
/// Records are produced once per scan and never mutated afterwards. Two records
/// refer to the same file when their `path` is equal.
///
/// # Examples
///
/// ```
/// use docsort::core_types::{FileKind, FileRecord};
/// use std::path::PathBuf;
///
/// let record = FileRecord {
///     path: PathBuf::from("/docs/Scan 001.PDF"),
///     name: "Scan 001.PDF".to_string(),
///     extension: ".pdf".to_string(),
///     size: 2048,
///     modified: None,
/// };
///
/// assert_eq!(record.kind(), Some(FileKind::Pdf));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// The absolute path to the file, inside the canonicalized directory. A
    /// symlink keeps its own path.
    pub path: PathBuf,
    /// The file name as displayed to the user.
    pub name: String,
    /// The lowercase extension including the leading dot, or empty if there is none.
    pub extension: String,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time, if the platform reports one.
    pub modified: Option<DateTime<Local>>,
}

impl FileRecord {
    /// The extractor route for this file, or `None` if the type is unsupported.
    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_extension(&self.extension)
    }
}

/// Returns everything before the last dot of a file name.
///
/// Names without a dot, and dotfiles such as `.env`, are returned whole.
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// The content type of a file, used to route it to an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Docx,
    Image,
    Text,
}

impl FileKind {
    /// Maps a lowercase, dot-prefixed extension to its kind.
    ///
    /// ```
    /// use docsort::core_types::FileKind;
    ///
    /// assert_eq!(FileKind::from_extension(".pdf"), Some(FileKind::Pdf));
    /// assert_eq!(FileKind::from_extension(".jpeg"), Some(FileKind::Image));
    /// assert_eq!(FileKind::from_extension(".zip"), None);
    /// ```
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            ".pdf" => Some(FileKind::Pdf),
            ".docx" => Some(FileKind::Docx),
            ext if IMAGE_EXTENSIONS.contains(&ext) => Some(FileKind::Image),
            ext if TEXT_EXTENSIONS.contains(&ext) => Some(FileKind::Text),
            _ => None,
        }
    }
}
