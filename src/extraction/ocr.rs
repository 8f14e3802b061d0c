use super::ExtractError;
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// Runs `tesseract <image> stdout` and returns the recognized text.
///
/// A binary that cannot be started is `OcrUnavailable`; a failed recognition
/// yields an empty string.
pub(super) fn extract(tesseract: &Path, path: &Path) -> Result<String, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::io(
            path,
            std::io::Error::new(ErrorKind::NotFound, "image not found"),
        ));
    }

    let output = Command::new(tesseract)
        .arg(path)
        .arg("stdout")
        .output()
        .map_err(|e| unavailable(tesseract, e))?;

    if !output.status.success() {
        warn!(
            "OCR failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(String::new());
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!("OCR read {} chars from '{}'", text.len(), path.display());
    Ok(text)
}

/// Checks that the OCR binary can be started.
pub(super) fn check_available(tesseract: &Path) -> Result<(), ExtractError> {
    Command::new(tesseract)
        .arg("--version")
        .output()
        .map(|_| ())
        .map_err(|e| unavailable(tesseract, e))
}

fn unavailable(tesseract: &Path, e: std::io::Error) -> ExtractError {
    let reason = if e.kind() == ErrorKind::NotFound {
        format!(
            "'{}' was not found. Install Tesseract OCR and make sure it is on your PATH.",
            tesseract.display()
        )
    } else {
        format!("failed to start '{}': {}", tesseract.display(), e)
    };
    ExtractError::OcrUnavailable(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_binary_on_extract_is_unavailable() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let image = temp.path().join("scan.png");
        fs::write(&image, b"\x89PNG")?;

        let result = extract(Path::new("/nonexistent/tesseract-docsort"), &image);

        match result {
            Err(ExtractError::OcrUnavailable(reason)) => assert!(reason.contains("not found")),
            other => panic!("Expected OcrUnavailable, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_missing_image_is_io_error() {
        let result = extract(Path::new("tesseract"), Path::new("/no/such/scan.png"));
        assert!(matches!(result, Err(ExtractError::Io { .. })));
    }
}
