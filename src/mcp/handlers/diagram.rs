//! Handler for the `generate_diagram` tool.

use std::{str::FromStr, sync::Arc};

use crate::{
    mcp::{
        format::build_diagram_response,
        handlers::{map_pipeline_error, parse_arguments},
    },
    pipeline::{DiagramKind, RagService},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

/// Request payload accepted by the `generate_diagram` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DiagramRequest {
    /// Topic or process the diagram should explain.
    pub(crate) query: String,
    /// Optional diagram dialect; defaults to `flowchart`.
    #[serde(default)]
    pub(crate) chart_type: Option<String>,
}

/// Handle `generate_diagram` by grounding a Mermaid diagram on retrieved documents.
pub(crate) async fn handle_diagram(
    service: &Arc<RagService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: DiagramRequest = parse_arguments(arguments)?;
    if args.query.trim().is_empty() {
        return Err(McpError::invalid_params("`query` must not be empty", None));
    }

    let kind = resolve_chart_type(args.chart_type.as_deref())?;

    let outcome = service
        .draft_diagram(&args.query, kind)
        .await
        .map_err(map_pipeline_error)?;

    Ok(CallToolResult::structured(build_diagram_response(&outcome)))
}

/// Resolve the wire name into a diagram kind, rejecting unknown values outright.
fn resolve_chart_type(chart_type: Option<&str>) -> Result<DiagramKind, McpError> {
    let Some(raw) = chart_type.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(DiagramKind::Flowchart);
    };

    DiagramKind::from_str(raw).map_err(|()| {
        McpError::invalid_params(
            format!(
                "`chart_type` must be one of {} (got '{raw}')",
                DiagramKind::ALL.join("|")
            ),
            None,
        )
    })
}
