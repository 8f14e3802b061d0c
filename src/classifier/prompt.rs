use super::ClassificationRequest;

/// Builds the system prompt for a closed category vocabulary.
pub(super) fn system_prompt(categories: &[String]) -> String {
    let category_list = categories
        .iter()
        .map(|c| format!("    - \"{}\"", c))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You organize personal documents. Read the file details and excerpt, then classify the file and propose a clean filename.

Rules:
1. Reply with a single JSON object and nothing else.
2. `suggested_basename` must be filesystem-safe: lowercase letters, digits and underscores only, without the extension.
3. When the text contains a clear date, put it in `suggested_basename` as YYYY-MM-DD and also return it in `date`.
4. `description` is a short human-readable summary of the content.
5. `category` must be one of:
{category_list}
6. `confidence` is your probability (0.0 to 1.0) that the category and name are right.
7. When nothing fits, use "other" and a generic `suggested_basename`.

Reply with exactly these keys:
{{
  "category": "string",
  "suggested_basename": "string",
  "confidence": 0.0,
  "date": "YYYY-MM-DD or null",
  "description": "string",
  "notes": "string"
}}"#
    )
}

/// Builds the per-file user prompt.
pub(super) fn user_prompt(request: &ClassificationRequest<'_>) -> String {
    format!(
        "Classify the following file and answer with the JSON object.\n\n\
         Original Filename: \"{}\"\n\
         File Extension: \"{}\"\n\
         Text Excerpt (first {} characters):\n---\n{}\n---\n",
        request.filename,
        request.extension,
        request.excerpt.chars().count(),
        request.excerpt
    )
}
