use super::{Classification, ClassificationRequest};
use crate::constants::{ERROR_CATEGORY, OTHER_CATEGORY};
use crate::core_types::file_stem;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

static INVALID_BASENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_-]+").unwrap());
static REPEATED_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// The JSON object the model is asked to return. Every field is optional so a
/// partial answer still yields a classification.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawClassification {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    suggested_basename: Option<String>,
    #[serde(default)]
    confidence: Option<Value>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Maps a raw model reply onto a well-formed `Classification`.
pub(super) fn normalize(
    raw: RawClassification,
    request: &ClassificationRequest<'_>,
    categories: &[String],
) -> Classification {
    Classification {
        category: normalize_category(raw.category.as_deref(), categories),
        suggested_basename: normalize_basename(
            raw.suggested_basename.as_deref(),
            request.filename,
            request.extension,
        ),
        confidence: normalize_confidence(raw.confidence.as_ref()),
        date: normalize_date(raw.date.as_ref()),
        description: raw.description.unwrap_or_default(),
        notes: raw.notes.unwrap_or_default(),
    }
}

fn normalize_category(raw: Option<&str>, categories: &[String]) -> String {
    let candidate = raw.unwrap_or_default().trim().to_lowercase();
    // "error" marks failed entries on the wire, never a real category.
    if candidate != ERROR_CATEGORY && categories.iter().any(|c| *c == candidate) {
        candidate
    } else {
        OTHER_CATEGORY.to_string()
    }
}

fn normalize_basename(raw: Option<&str>, filename: &str, extension: &str) -> String {
    let mut lowered = raw.unwrap_or_default().trim().to_lowercase();
    if !extension.is_empty() && lowered.ends_with(extension) {
        lowered.truncate(lowered.len() - extension.len());
    }
    let replaced = INVALID_BASENAME_CHARS.replace_all(&lowered, "_");
    let collapsed = REPEATED_UNDERSCORES.replace_all(&replaced, "_");
    let cleaned = collapsed.trim_matches(|c| c == '_' || c == '-');
    if cleaned.is_empty() {
        format!("unclassified_{}", file_stem(filename))
    } else {
        cleaned.to_string()
    }
}

fn normalize_confidence(raw: Option<&Value>) -> f64 {
    let value = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

fn normalize_date(raw: Option<&Value>) -> Option<NaiveDate> {
    match raw {
        Some(Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> ClassificationRequest<'static> {
        ClassificationRequest {
            filename: "Scan 001.pdf",
            extension: ".pdf",
            excerpt: "",
        }
    }

    fn vocabulary() -> Vec<String> {
        vec!["invoice".to_string(), "other".to_string()]
    }

    #[test]
    fn test_full_reply_is_kept() -> anyhow::Result<()> {
        let raw: RawClassification = serde_json::from_value(json!({
            "category": "Invoice",
            "suggested_basename": "invoice_2025-11-09",
            "confidence": 0.93,
            "date": "2025-11-09",
            "description": "Invoice #123",
            "notes": ""
        }))?;

        let c = normalize(raw, &request(), &vocabulary());

        assert_eq!(c.category, "invoice");
        assert_eq!(c.suggested_basename, "invoice_2025-11-09");
        assert!((c.confidence - 0.93).abs() < f64::EPSILON);
        assert_eq!(c.date, NaiveDate::from_ymd_opt(2025, 11, 9));
        assert_eq!(c.description, "Invoice #123");
        Ok(())
    }

    #[test]
    fn test_unknown_category_becomes_other() {
        assert_eq!(normalize_category(Some("spaceship"), &vocabulary()), "other");
        assert_eq!(normalize_category(Some("error"), &vocabulary()), "other");
        assert_eq!(normalize_category(None, &vocabulary()), "other");
    }

    #[test]
    fn test_error_reply_is_never_a_category() {
        let vocabulary = vec!["error".to_string(), "invoice".to_string(), "other".to_string()];
        assert_eq!(normalize_category(Some("Error"), &vocabulary), "other");
        assert_eq!(normalize_category(Some("invoice"), &vocabulary), "invoice");
    }

    #[test]
    fn test_basename_is_made_filesystem_safe() {
        assert_eq!(
            normalize_basename(Some("Tax Return / 2024!"), "a.pdf", ".pdf"),
            "tax_return_2024"
        );
        assert_eq!(
            normalize_basename(Some("receipt_store.pdf"), "a.pdf", ".pdf"),
            "receipt_store"
        );
        assert_eq!(
            normalize_basename(Some("../../etc/passwd"), "a.pdf", ".pdf"),
            "etc_passwd"
        );
        assert_eq!(
            normalize_basename(Some("  "), "Scan 001.pdf", ".pdf"),
            "unclassified_Scan 001"
        );
        assert_eq!(normalize_basename(None, "notes.txt", ".txt"), "unclassified_notes");
    }

    #[test]
    fn test_confidence_accepts_strings_and_clamps() {
        assert_eq!(normalize_confidence(Some(&json!("0.5"))), 0.5);
        assert_eq!(normalize_confidence(Some(&json!(7))), 1.0);
        assert_eq!(normalize_confidence(Some(&json!(-1.0))), 0.0);
        assert_eq!(normalize_confidence(Some(&json!("high"))), 0.0);
        assert_eq!(normalize_confidence(None), 0.0);
    }

    #[test]
    fn test_date_requires_iso_format() {
        assert_eq!(
            normalize_date(Some(&json!("2024-02-29"))),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(normalize_date(Some(&json!("Nov 9, 2025"))), None);
        assert_eq!(normalize_date(Some(&json!(null))), None);
    }
}
