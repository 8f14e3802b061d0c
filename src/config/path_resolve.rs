// src/config/path_resolve.rs

use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};

/// Resolves the directory to organize to an absolute, canonicalized path.
///
/// # Errors
/// Returns `Error::InvalidDirectory` if the path does not exist or is not a directory.
pub fn resolve_directory(input: impl AsRef<Path>) -> Result<PathBuf> {
    let input = input.as_ref();
    match input.canonicalize() {
        Ok(resolved) if resolved.is_dir() => Ok(resolved),
        Ok(_) => Err(Error::InvalidDirectory(input.to_path_buf())),
        Err(e) => {
            log::debug!("Failed to resolve '{}': {}", input.display(), e);
            Err(Error::InvalidDirectory(input.to_path_buf()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_existing_dir() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let resolved = resolve_directory(temp.path())?;
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());
        Ok(())
    }

    #[test]
    fn test_resolve_file_is_rejected() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let file_path = temp.path().join("test.txt");
        fs::write(&file_path, "content")?;
        let result = resolve_directory(&file_path);
        assert!(matches!(result, Err(Error::InvalidDirectory(_))));
        Ok(())
    }

    #[test]
    fn test_resolve_non_existent_path() {
        let result = resolve_directory("non_existent_path_for_testing_docsort");
        assert!(matches!(result, Err(Error::InvalidDirectory(_))));
    }
}
