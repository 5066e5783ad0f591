//! Query interpretation: free text in, structured search parameters out.
//!
//! The generative backend is asked for a single JSON object, but its output is
//! inherently unreliable. Parsing here is best-effort with a guaranteed-safe
//! fallback: whenever the response cannot be used, the raw query becomes the
//! keyword and ordering/filtering are dropped.

use serde::Deserialize;
use time::Date;
use time::macros::format_description;

use crate::search::SearchParameters;

/// Build the fixed instruction prompt for search-parameter extraction.
pub(crate) fn build_interpreter_prompt(query: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "Extract search parameters from the user request below.\n\
         Return a single JSON object with exactly these keys:\n\
         - \"query\": the keyword phrase to search for (required)\n\
         - \"order_by\": a sort expression over the `date` field, or null\n\
         - \"filter\": a filter expression over the `date` field, or null\n\
         \n\
         Rules:\n\
         - When the request implies recency (\"latest\", \"most recent\", \
         \"newest\"), set \"order_by\" to \"date desc\".\n\
         - When the request names an explicit period, set \"filter\" using \
         ISO dates, e.g. date >= \"2026-01-26\".\n\
         - Otherwise leave \"order_by\" and \"filter\" null.\n\
         - Output the JSON object only, no commentary.\n\
         \n\
         User request:\n",
    );
    prompt.push_str(query);
    prompt
}

/// Lenient shape of the backend's extraction response.
#[derive(Debug, Default, Deserialize)]
struct InterpreterPayload {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    order_by: Option<String>,
    #[serde(default)]
    filter: Option<String>,
}

/// Parse the backend response into search parameters, falling back to the raw query.
pub(crate) fn parse_search_parameters(query: &str, raw: &str) -> SearchParameters {
    let Some(payload) = extract_json_object(raw) else {
        tracing::debug!("Extraction response carried no JSON object; using raw query");
        return SearchParameters::from_keyword(query);
    };

    let payload: InterpreterPayload = match serde_json::from_str(&payload) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::debug!(%error, "Extraction response failed to parse; using raw query");
            return SearchParameters::from_keyword(query);
        }
    };

    let keyword = payload
        .query
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(query)
        .to_string();

    SearchParameters {
        keyword,
        order_by: payload.order_by.as_deref().and_then(sanitize_order_by),
        filter: payload.filter.as_deref().and_then(sanitize_filter),
    }
}

/// Locate the outermost JSON object in a possibly fenced response body.
fn extract_json_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(raw[start..=end].to_string())
}

/// Accept only `field` or `field asc|desc` over identifier characters.
fn sanitize_order_by(raw: &str) -> Option<String> {
    let mut tokens = raw.trim().split_whitespace();
    let field = tokens.next()?;
    if field.is_empty()
        || !field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return None;
    }

    let direction = match tokens.next() {
        None => None,
        Some(word) if word.eq_ignore_ascii_case("asc") => Some("asc"),
        Some(word) if word.eq_ignore_ascii_case("desc") => Some("desc"),
        Some(_) => return None,
    };
    if tokens.next().is_some() {
        return None;
    }

    Some(match direction {
        Some(direction) => format!("{field} {direction}"),
        None => field.to_string(),
    })
}

/// Accept a filter only when every quoted literal parses as a calendar date.
///
/// The backend rejects malformed filters with a request error; dropping them
/// here keeps the degrade-gracefully contract instead of failing the search.
fn sanitize_filter(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let format = format_description!("[year]-[month]-[day]");
    let mut saw_literal = false;
    for literal in quoted_literals(trimmed) {
        saw_literal = true;
        if Date::parse(&literal, &format).is_err() {
            tracing::debug!(filter = trimmed, literal = %literal, "Dropping filter with non-date literal");
            return None;
        }
    }
    if !saw_literal {
        return None;
    }

    Some(trimmed.to_string())
}

/// Yield the contents of every single- or double-quoted span.
fn quoted_literals(input: &str) -> Vec<String> {
    let mut literals = Vec::new();
    let mut rest = input;
    while let Some(start) = rest.find(|c| c == '"' || c == '\'') {
        let quote = rest.as_bytes()[start] as char;
        let after = &rest[start + 1..];
        match after.find(quote) {
            Some(end) => {
                literals.push(after[..end].to_string());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    literals
}
