use super::{truncate_chars, ExtractError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// Upper bound on UTF-8 bytes per char.
const MAX_UTF8_BYTES: u64 = 4;

/// Reads up to `max_chars` characters of a text file, replacing invalid UTF-8.
pub(super) fn extract(path: &Path, max_chars: usize) -> Result<String, ExtractError> {
    let file = File::open(path).map_err(|e| ExtractError::io(path, e))?;
    let mut bytes = Vec::new();
    file.take((max_chars as u64).saturating_mul(MAX_UTF8_BYTES))
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::io(path, e))?;

    let text = String::from_utf8_lossy(&bytes);
    Ok(truncate_chars(&text, max_chars).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_reads_and_truncates() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("note.txt");
        fs::write(&path, "ä".repeat(50))?;

        let text = extract(&path, 10)?;

        assert_eq!(text.chars().count(), 10);
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_replaced() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9 menu")?;

        let text = extract(&path, 100)?;

        assert!(text.starts_with("caf"));
        assert!(text.ends_with(" menu"));
        Ok(())
    }
}
