// src/constants.rs

/// Default chat model used for classification.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default endpoint root for the OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API endpoint root.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Environment variable overriding the default model.
pub const MODEL_ENV: &str = "DOCSORT_MODEL";

/// Maximum characters of extracted text sent to the classifier.
pub const MAX_CHARS_PER_FILE: usize = 8000;

/// Number of concurrent planner workers.
pub const DEFAULT_WORKERS: usize = 5;

/// Name of the audit log written into the organized directory.
pub const AUDIT_LOG_FILENAME: &str = "metadata.json";

/// Category written to the audit log for entries whose classification failed.
pub const ERROR_CATEGORY: &str = "error";

/// Fallback category for anything outside the vocabulary.
pub const OTHER_CATEGORY: &str = "other";

/// Image extensions that are read through OCR.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".heic", ".webp"];

/// Plain text extensions that are read directly.
pub const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md", ".rtf"];

/// Default closed vocabulary of categories offered to the classifier.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "insurance",
    "ticket",
    "vote",
    "legal",
    "personal",
    "screenshot",
    "receipt",
    "finance",
    "work",
    "invoice",
    "manual",
    "medical",
    "travel",
    "education",
    "other",
];

/// Classifier attempts before an entry is marked as failed.
pub const CLASSIFY_MAX_ATTEMPTS: u32 = 3;

/// HTTP timeout for a single classification request, in seconds.
pub const CLASSIFY_TIMEOUT_SECS: u64 = 90;
