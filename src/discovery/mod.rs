//! Lists the files of the directory being organized.
use crate::cancellation::CancellationToken;
use crate::core_types::FileRecord;
use crate::errors::{Error, Result};
use log::debug;
use std::path::Path;

mod entry_processor;
mod walker;

use entry_processor::process_direntry;
use walker::build_walker;

/// Lists the eligible files directly inside `directory`.
///
/// The listing is non-recursive. Hidden files and directories are excluded, and
/// entries that raise an access error are logged and skipped. Files larger than
/// `max_size` bytes are left out. Records come back sorted by file name.
///
/// # Errors
/// Returns `Error::InvalidDirectory` if `directory` is not a directory and
/// `Error::Interrupted` if the token is cancelled during the walk.
///
/// # Examples
///
/// ```
/// use docsort::discovery::list_files;
/// use docsort::CancellationToken;
/// use std::fs;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// fs::write(dir.path().join("note.txt"), "hello")?;
/// fs::write(dir.path().join(".hidden.txt"), "secret")?;
/// fs::create_dir(dir.path().join("sub"))?;
///
/// let files = list_files(dir.path(), None, &CancellationToken::new())?;
/// assert_eq!(files.len(), 1);
/// assert_eq!(files[0].name, "note.txt");
/// # Ok(())
/// # }
/// ```
pub fn list_files(
    directory: &Path,
    max_size: Option<u128>,
    token: &CancellationToken,
) -> Result<Vec<FileRecord>> {
    if !directory.is_dir() {
        return Err(Error::InvalidDirectory(directory.to_path_buf()));
    }
    token.check()?;

    let mut files = Vec::new();
    for entry_result in build_walker(directory) {
        token.check()?;
        if let Some(record) = process_direntry(entry_result, max_size) {
            files.push(record);
        }
    }

    debug!(
        "Discovery complete. {} file(s) in '{}'.",
        files.len(),
        directory.display()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lists_only_top_level_visible_files() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("b.pdf"), "b")?;
        fs::write(temp.path().join("a.TXT"), "a")?;
        fs::write(temp.path().join(".DS_Store"), "x")?;
        fs::create_dir(temp.path().join("invoice"))?;
        fs::write(temp.path().join("invoice").join("nested.pdf"), "n")?;

        let files = list_files(temp.path(), None, &CancellationToken::new())?;

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.TXT", "b.pdf"]);
        assert_eq!(files[0].extension, ".txt");
        assert!(files[0].path.is_absolute());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_keeps_link_path() -> anyhow::Result<()> {
        let outside = tempdir()?;
        let target = outside.path().join("report.pdf");
        fs::write(&target, "pdf")?;
        let temp = tempdir()?;
        std::os::unix::fs::symlink(&target, temp.path().join("link.pdf"))?;

        let files = list_files(temp.path(), None, &CancellationToken::new())?;

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "link.pdf");
        assert_eq!(files[0].path, temp.path().canonicalize()?.join("link.pdf"));
        assert_eq!(files[0].size, 3);
        Ok(())
    }

    #[test]
    fn test_max_size_skips_large_files() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("small.txt"), "12345")?;
        fs::write(temp.path().join("large.txt"), "x".repeat(100))?;

        let files = list_files(temp.path(), Some(10), &CancellationToken::new())?;

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "small.txt");
        Ok(())
    }

    #[test]
    fn test_cancelled_token_interrupts() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("a.txt"), "a")?;
        let token = CancellationToken::new();
        token.cancel();

        let result = list_files(temp.path(), None, &token);

        assert!(matches!(result, Err(Error::Interrupted)));
        Ok(())
    }

    #[test]
    fn test_file_path_is_not_a_directory() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let file = temp.path().join("a.txt");
        fs::write(&file, "a")?;

        let result = list_files(&file, None, &CancellationToken::new());

        assert!(matches!(result, Err(Error::InvalidDirectory(_))));
        Ok(())
    }
}
