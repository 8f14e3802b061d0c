// src/output/formatter.rs

//! Helpers for formatting parts of the output.

use std::path::Path;

/// Formats `path` relative to `base` for display, with `/` separators.
///
/// Paths outside `base` are shown in full.
///
/// # Examples
/// ```
/// use docsort::output::formatter::display_relative;
/// use std::path::Path;
///
/// let base = Path::new("/docs");
/// assert_eq!(display_relative(Path::new("/docs/invoice/a.pdf"), base), "invoice/a.pdf");
/// assert_eq!(display_relative(Path::new("/elsewhere/b.pdf"), base), "/elsewhere/b.pdf");
/// ```
pub fn display_relative(path: &Path, base: &Path) -> String {
    let shown = path.strip_prefix(base).unwrap_or(path);
    shown.to_string_lossy().replace('\\', "/")
}

/// Formats a confidence value as a whole percentage.
pub fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}
