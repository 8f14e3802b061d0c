use log::{debug, error};
use std::fs;
use std::path::{Path, PathBuf};

/// Moves `old_path` to `desired`, or to the first free `{stem}_{n}{ext}` next to it.
///
/// Missing parent directories are created. Existence is checked afresh for each
/// candidate. Returns the path the file ended up at; on any filesystem failure
/// the failure is logged and `old_path` is returned unchanged.
///
/// # Examples
///
/// ```
/// use docsort::applier::rename_with_collision;
/// use std::fs;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// fs::write(dir.path().join("a.txt"), "new")?;
/// fs::create_dir(dir.path().join("other"))?;
/// fs::write(dir.path().join("other/target.txt"), "existing")?;
///
/// let moved = rename_with_collision(&dir.path().join("a.txt"), &dir.path().join("other/target.txt"));
///
/// assert_eq!(moved, dir.path().join("other/target_1.txt"));
/// assert_eq!(fs::read_to_string(dir.path().join("other/target.txt"))?, "existing");
/// # Ok(())
/// # }
/// ```
pub fn rename_with_collision(old_path: &Path, desired: &Path) -> PathBuf {
    if old_path == desired {
        debug!("'{}' is already in place.", old_path.display());
        return old_path.to_path_buf();
    }

    if let Some(parent) = desired.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            error!(
                "Could not create directory '{}' for '{}': {}",
                parent.display(),
                old_path.display(),
                e
            );
            return old_path.to_path_buf();
        }
    }

    let target = free_path(desired);
    match fs::rename(old_path, &target) {
        Ok(()) => {
            debug!("Renamed '{}' -> '{}'", old_path.display(), target.display());
            target
        }
        Err(e) => {
            error!(
                "Failed to rename '{}' to '{}': {}",
                old_path.display(),
                target.display(),
                e
            );
            old_path.to_path_buf()
        }
    }
}

/// First candidate among `desired`, `{stem}_1{ext}`, `{stem}_2{ext}`, ... that does not exist.
fn free_path(desired: &Path) -> PathBuf {
    if !exists(desired) {
        return desired.to_path_buf();
    }

    let parent = desired.parent().unwrap_or_else(|| Path::new(""));
    let name = desired
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{}", ext)),
        _ => (name.clone(), String::new()),
    };

    let mut counter: u64 = 1;
    loop {
        let candidate = parent.join(format!("{}_{}{}", stem, counter, ext));
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

// Counts dangling symlinks as taken.
fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
