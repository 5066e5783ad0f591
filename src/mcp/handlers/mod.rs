//! Tool handlers for the MCP server.

use rmcp::{ErrorData as McpError, model::JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::pipeline::PipelineError;

pub mod diagram;
pub mod search;
pub mod slides;

/// Parse structured arguments supplied to a tool invocation.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    let value = arguments
        .map(Value::Object)
        .unwrap_or_else(|| Value::Object(JsonObject::new()));
    serde_json::from_value(value)
        .map_err(|err| McpError::invalid_params(format!("Invalid arguments: {err}"), None))
}

/// Map pipeline errors onto MCP error codes at the tool boundary.
pub(crate) fn map_pipeline_error(error: PipelineError) -> McpError {
    match error {
        PipelineError::InvalidInput(message) => McpError::invalid_params(message, None),
        PipelineError::Search(source) => {
            McpError::internal_error(format!("Search backend request failed: {source}"), None)
        }
        PipelineError::Generation(source) => {
            McpError::internal_error(format!("Generation backend request failed: {source}"), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationClientError;
    use crate::search::SearchBackendError;

    #[test]
    fn invalid_input_maps_to_invalid_params() {
        let mapped = map_pipeline_error(PipelineError::InvalidInput("query empty".into()));
        assert_eq!(mapped.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(mapped.message.contains("query empty"));
    }

    #[test]
    fn backend_errors_map_to_internal_error() {
        let search = map_pipeline_error(PipelineError::Search(SearchBackendError::InvalidUrl(
            "bad".into(),
        )));
        assert_eq!(search.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(search.message.contains("Search backend"));

        let generation = map_pipeline_error(PipelineError::Generation(
            GenerationClientError::GenerationFailed("503".into()),
        ));
        assert_eq!(generation.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(generation.message.contains("Generation backend"));
    }
}
