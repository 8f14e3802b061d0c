// src/config/parsing.rs

use crate::constants::{ERROR_CATEGORY, OTHER_CATEGORY};
use crate::errors::{ConfigError, Error, Result};
use crate::plan::sanitize_category;
use byte_unit::Byte;
use std::str::FromStr;
use url::Url;

/// Parses the optional max size string into Option<u128>.
pub(super) fn parse_max_size(max_size_str: Option<&str>) -> Result<Option<u128>> {
    max_size_str
        .map(|s| {
            Byte::from_str(s)
                .map(|b| b.as_u128())
                .map_err(|e| {
                    Error::from(ConfigError::InvalidValue {
                        option: "--max-size".to_string(),
                        reason: format!("Invalid size format '{}': {}", s, e),
                    })
                })
        })
        .transpose()
}

/// Normalizes a category list: trimmed, lowercase, de-duplicated, order kept.
///
/// `other` is appended when missing so the classifier always has a fallback.
/// `error` is reserved for failed classifications and is rejected, as is any
/// name that leaves no folder name once sanitized.
pub(super) fn normalize_categories<I, S>(categories: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for raw in categories {
        let category = raw.as_ref().trim().to_lowercase();
        if category.is_empty() {
            continue;
        }
        if !category.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(ConfigError::InvalidValue {
                option: "--categories".to_string(),
                reason: format!(
                    "'{}' must contain only letters, digits and underscores",
                    category
                ),
            }
            .into());
        }
        if category == ERROR_CATEGORY {
            return Err(ConfigError::InvalidValue {
                option: "--categories".to_string(),
                reason: format!("'{}' is reserved for failed classifications", category),
            }
            .into());
        }
        if sanitize_category(&category).is_empty() {
            return Err(ConfigError::InvalidValue {
                option: "--categories".to_string(),
                reason: format!("'{}' does not name a folder", category),
            }
            .into());
        }
        if !normalized.contains(&category) {
            normalized.push(category);
        }
    }
    if !normalized.iter().any(|c| c == OTHER_CATEGORY) {
        normalized.push(OTHER_CATEGORY.to_string());
    }
    Ok(normalized)
}

/// Parses the API endpoint root, making sure it ends with a slash so that
/// relative joins keep the last path segment.
pub(super) fn parse_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&with_slash).map_err(|e| ConfigError::InvalidValue {
        option: "base URL".to_string(),
        reason: format!("'{}': {}", raw, e),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            option: "base URL".to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }
        .into()),
    }
}

/// Rejects zero for options that count something.
pub(super) fn require_positive(value: usize, option: &str) -> Result<usize> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            option: option.to_string(),
            reason: "must be at least 1".to_string(),
        }
        .into());
    }
    Ok(value)
}
