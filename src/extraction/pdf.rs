use super::ExtractError;
use log::{debug, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

const ENCRYPT_MARKER: &[u8] = b"/Encrypt";

/// Extracts the text layer of a PDF.
///
/// Encrypted documents, parser errors and parser panics all yield an empty string.
pub(super) fn extract(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;
    debug!("Read PDF '{}' ({} bytes)", path.display(), bytes.len());

    if is_encrypted(&bytes) {
        warn!("PDF '{}' is encrypted; no text extracted.", path.display());
        return Ok(String::new());
    }

    // pdf-extract can panic on malformed fonts.
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("PDF extraction failed for '{}': {}", path.display(), e);
            Ok(String::new())
        }
        Err(_) => {
            warn!("PDF parser panicked on '{}'.", path.display());
            Ok(String::new())
        }
    }
}

fn is_encrypted(bytes: &[u8]) -> bool {
    bytes
        .windows(ENCRYPT_MARKER.len())
        .any(|window| window == ENCRYPT_MARKER)
}
