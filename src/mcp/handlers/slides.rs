//! Handler for the `generate_slide_draft` tool.

use std::sync::Arc;

use crate::{
    mcp::{
        format::build_slide_draft_response,
        handlers::{map_pipeline_error, parse_arguments},
    },
    pipeline::RagService,
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

/// Request payload accepted by the `generate_slide_draft` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SlideDraftRequest {
    /// Topic or request the slide outline should cover.
    pub(crate) query: String,
}

/// Handle `generate_slide_draft` by grounding a Marp outline on retrieved documents.
pub(crate) async fn handle_slide_draft(
    service: &Arc<RagService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: SlideDraftRequest = parse_arguments(arguments)?;
    if args.query.trim().is_empty() {
        return Err(McpError::invalid_params("`query` must not be empty", None));
    }

    let outcome = service
        .draft_slides(&args.query)
        .await
        .map_err(map_pipeline_error)?;

    Ok(CallToolResult::structured(build_slide_draft_response(
        &outcome,
    )))
}
