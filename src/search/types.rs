//! Shared types used by the search client and helpers.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned while interacting with the search backend.
#[derive(Debug, Error)]
pub enum SearchBackendError {
    /// Endpoint URL failed to parse or normalize.
    #[error("Invalid search endpoint URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Search backend responded with an unexpected status code.
    #[error("Unexpected search backend response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the search backend.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Structured search parameters produced by the query interpreter.
///
/// Constructed once per request and consumed exactly once by
/// [`crate::search::VertexSearchClient::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParameters {
    /// Keyword phrase submitted to the search backend. Never empty.
    pub keyword: String,
    /// Optional sort expression, e.g. `date desc`.
    pub order_by: Option<String>,
    /// Optional filter expression, e.g. `date >= "2026-01-26"`.
    pub filter: Option<String>,
}

impl SearchParameters {
    /// Build parameters that search for the raw query with no ordering or filter.
    pub fn from_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            order_by: None,
            filter: None,
        }
    }
}

/// One retrieved document fragment with its source metadata.
///
/// Ordering within a result list reflects backend relevance/sort order and is
/// preserved through to the final citation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    /// Document title reported by the backend.
    pub title: String,
    /// Link to the source document; may be empty for unlinked stores.
    pub uri: String,
    /// Extracted snippet text; may be empty when the backend returns none.
    pub snippet: String,
}

#[derive(Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) results: Vec<SearchResponseResult>,
}

#[derive(Deserialize)]
pub(crate) struct SearchResponseResult {
    #[serde(default)]
    pub(crate) document: Option<DocumentPayload>,
}

#[derive(Deserialize)]
pub(crate) struct DocumentPayload {
    #[serde(default, rename = "derivedStructData")]
    pub(crate) derived_struct_data: Option<Map<String, Value>>,
}
