//! Helpers for mapping Discovery Engine documents into result items.
//!
//! The backend reports extracted content under several shapes depending on the
//! data store kind (`extractive_segments`, `extractive_answers`, `snippets`),
//! and the field carrying the text differs between them. The mapping here
//! collects every candidate list and pulls text out of each entry defensively.

use serde_json::{Map, Value};

use crate::search::types::{DocumentPayload, SearchResultItem};

const CONTENT_LISTS: [&str; 3] = ["extractive_segments", "extractive_answers", "snippets"];
const CONTENT_KEYS: [&str; 4] = ["content", "snippet", "htmlSnippet", "text"];

/// Minimum length for the longest-string fallback; shorter values are metadata noise.
const MIN_FALLBACK_LEN: usize = 10;

/// Map one search response document into a [`SearchResultItem`].
///
/// Returns `None` when the document carries no derived metadata at all.
pub(crate) fn map_document(document: Option<DocumentPayload>) -> Option<SearchResultItem> {
    let data = document?.derived_struct_data?;

    let title = string_field(&data, "title").unwrap_or_else(|| "Untitled".into());
    let uri = string_field(&data, "link").unwrap_or_default();

    let mut content_parts = Vec::new();
    for list_key in CONTENT_LISTS {
        if let Some(Value::Array(entries)) = data.get(list_key) {
            for entry in entries {
                if let Some(text) = extract_entry_text(entry) {
                    content_parts.push(clean_snippet(&text));
                }
            }
        }
    }

    Some(SearchResultItem {
        title,
        uri,
        snippet: content_parts.join("\n\n"),
    })
}

fn string_field(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Pull the text out of one extractive entry.
///
/// Well-known keys are checked first; when none match, the longest string value
/// in the entry is used so schema drift degrades to slightly noisier snippets
/// instead of empty ones.
fn extract_entry_text(entry: &Value) -> Option<String> {
    let object = entry.as_object()?;

    for key in CONTENT_KEYS {
        if let Some(text) = object.get(key).and_then(Value::as_str)
            && !text.trim().is_empty()
        {
            return Some(text.to_string());
        }
    }

    object
        .values()
        .filter_map(Value::as_str)
        .max_by_key(|value| value.len())
        .filter(|value| value.len() > MIN_FALLBACK_LEN)
        .map(str::to_string)
}

/// Strip highlight markup and flatten newlines inside one snippet.
fn clean_snippet(text: &str) -> String {
    text.replace("<b>", "")
        .replace("</b>", "")
        .replace('\n', " ")
        .trim()
        .to_string()
}
