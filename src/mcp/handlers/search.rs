//! Handler for the `search_documents` tool.

use std::sync::Arc;

use crate::{
    mcp::{
        format::build_answer_response,
        handlers::{map_pipeline_error, parse_arguments},
    },
    pipeline::RagService,
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

/// Request payload accepted by the `search_documents` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SearchDocumentsRequest {
    /// Search keywords or a natural-language question.
    pub(crate) query: String,
}

/// Handle `search_documents` by running the full interpret-search-compose pipeline.
pub(crate) async fn handle_search_documents(
    service: &Arc<RagService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: SearchDocumentsRequest = parse_arguments(arguments)?;
    if args.query.trim().is_empty() {
        return Err(McpError::invalid_params("`query` must not be empty", None));
    }

    let outcome = service
        .answer_query(&args.query)
        .await
        .map_err(map_pipeline_error)?;

    Ok(CallToolResult::structured(build_answer_response(&outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arguments_require_a_query() {
        let error = parse_arguments::<SearchDocumentsRequest>(Some(
            json!({}).as_object().expect("object").clone(),
        ))
        .expect_err("missing query");
        assert_eq!(error.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn arguments_reject_unknown_fields() {
        let error = parse_arguments::<SearchDocumentsRequest>(Some(
            json!({ "query": "standup", "limit": 5 })
                .as_object()
                .expect("object")
                .clone(),
        ))
        .expect_err("unknown field");
        assert_eq!(error.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }
}
