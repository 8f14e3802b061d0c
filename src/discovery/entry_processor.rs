use crate::core_types::FileRecord;
use chrono::{DateTime, Local};
use ignore::DirEntry;
use log::{debug, trace, warn};
use std::path::Path;

/// Turns one walker entry into a `FileRecord`.
///
/// Returns `None` for the root itself, directories, entries that cannot be
/// inspected (logged and skipped) and files larger than `max_size`.
pub(super) fn process_direntry(
    entry_result: Result<DirEntry, ignore::Error>,
    max_size: Option<u128>,
) -> Option<FileRecord> {
    let entry = match entry_result {
        Ok(entry) => entry,
        Err(e) => {
            warn!("Skipping unreadable entry: {}", e);
            return None;
        }
    };

    if entry.depth() == 0 {
        return None;
    }

    let path = entry.path();
    trace!("Processing entry: {}", path.display());

    // Follows symlinks so a link to a document is listed like the document.
    let metadata = match std::fs::metadata(path) {
        Ok(md) => md,
        Err(e) => {
            warn!(
                "Skipping entry '{}' due to metadata error: {}",
                path.display(),
                e
            );
            return None;
        }
    };

    if !metadata.is_file() {
        trace!("Skipping non-file entry: {}", path.display());
        return None;
    }

    if let Some(limit) = max_size {
        if u128::from(metadata.len()) > limit {
            debug!(
                "Skipping file due to size constraint: {} (Size: {} bytes)",
                path.display(),
                metadata.len()
            );
            return None;
        }
    }

    let name = entry.file_name().to_string_lossy().into_owned();
    // Only the directory is resolved: a symlink keeps its own path, so a rename
    // moves the link and never its target.
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let absolute_path = match parent.canonicalize() {
        Ok(dir) => dir.join(entry.file_name()),
        Err(e) => {
            warn!("Skipping '{}': cannot resolve path: {}", path.display(), e);
            return None;
        }
    };

    Some(FileRecord {
        extension: lowercase_extension(&name),
        size: metadata.len(),
        modified: metadata.modified().ok().map(DateTime::<Local>::from),
        path: absolute_path,
        name,
    })
}

/// Lowercase extension with its leading dot, or empty when the name has none.
fn lowercase_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!(".{}", ext.to_lowercase())
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_extension() {
        assert_eq!(lowercase_extension("Scan.PDF"), ".pdf");
        assert_eq!(lowercase_extension("photo.final.JPEG"), ".jpeg");
        assert_eq!(lowercase_extension("README"), "");
        assert_eq!(lowercase_extension("trailing."), "");
        assert_eq!(lowercase_extension(".profile"), "");
    }
}
