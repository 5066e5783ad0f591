//! Vertex AI Search (Discovery Engine) integration.

pub mod client;
mod extract;
pub mod types;

pub use client::VertexSearchClient;
pub use types::{SearchBackendError, SearchParameters, SearchResultItem};
