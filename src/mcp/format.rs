//! Formatting helpers shared across MCP handlers and resources.

use crate::{
    config::Config,
    pipeline::{AnswerOutcome, DiagramKind, DiagramOutcome, SlideDraftOutcome, SourceRef},
    search::SearchParameters,
};
use rmcp::model::ResourceContents;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value, json};

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Format the static chart-types manifest returned via MCP resources.
pub(crate) fn chart_types_payload() -> String {
    serde_json::to_string_pretty(&json!({
        "chart_types": DiagramKind::ALL,
        "default": "flowchart"
    }))
    .unwrap_or_else(|_| "{\"chart_types\":[],\"default\":\"flowchart\"}".into())
}

/// Build the health payload summarizing backend configuration.
pub(crate) fn health_payload(config: &Config) -> String {
    let payload = json!({
        "search": {
            "engineId": config.engine_id,
            "location": config.gcp_location,
            "pageSize": config.search_page_size,
        },
        "generation": {
            "model": config.gemini_model,
            "location": config.gemini_location,
        },
        "project": config.gcp_project_id,
        "hasAccessToken": config.access_token.is_some(),
    });

    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}

/// Usage manifest returned by the `usage` resource.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct UsageSnapshot {
    /// Short description of the server's purpose.
    pub(crate) title: String,
    /// Recommended usage policy lines.
    pub(crate) policy: Vec<String>,
}

/// Echo of the search conditions that were actually applied.
fn used_search(params: &SearchParameters) -> Value {
    let mut map = Map::new();
    map.insert("keyword".into(), Value::String(params.keyword.clone()));
    if let Some(order_by) = &params.order_by {
        map.insert("order_by".into(), Value::String(order_by.clone()));
    }
    if let Some(filter) = &params.filter {
        map.insert("filter".into(), Value::String(filter.clone()));
    }
    Value::Object(map)
}

fn sources_to_values(sources: &[SourceRef]) -> Vec<Value> {
    sources
        .iter()
        .map(|source| {
            json!({
                "title": source.title,
                "uri": source.uri,
            })
        })
        .collect()
}

/// Assemble the structured `search_documents` response.
pub(crate) fn build_answer_response(outcome: &AnswerOutcome) -> Value {
    json!({
        "answer": outcome.answer.text,
        "sources": sources_to_values(&outcome.answer.sources),
        "used_search": used_search(&outcome.params),
        "results_considered": outcome.results_considered,
    })
}

/// Assemble the structured `generate_slide_draft` response.
pub(crate) fn build_slide_draft_response(outcome: &SlideDraftOutcome) -> Value {
    json!({
        "markdown": outcome.markdown,
        "used_search": used_search(&outcome.params),
        "results_considered": outcome.results_considered,
    })
}

/// Assemble the structured `generate_diagram` response.
pub(crate) fn build_diagram_response(outcome: &DiagramOutcome) -> Value {
    json!({
        "code": outcome.code,
        "chart_type": outcome.kind.as_str(),
        "used_search": used_search(&outcome.params),
        "results_considered": outcome.results_considered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::GeneratedAnswer;

    #[test]
    fn chart_types_payload_is_valid_json() {
        let body = chart_types_payload();
        let value: Value =
            serde_json::from_str(&body).expect("chart-types payload must be valid JSON");
        assert_eq!(value["default"], "flowchart");
        let kinds = value["chart_types"].as_array().expect("chart_types array");
        assert_eq!(kinds.len(), 7);
    }

    #[test]
    fn answer_response_echoes_sources_and_search_conditions() {
        let outcome = AnswerOutcome {
            answer: GeneratedAnswer {
                text: "The importer shipped. [1]".into(),
                sources: vec![SourceRef {
                    title: "Standup notes".into(),
                    uri: "https://example.com/standup".into(),
                }],
            },
            params: SearchParameters {
                keyword: "standup".into(),
                order_by: Some("date desc".into()),
                filter: None,
            },
            results_considered: 3,
        };

        let payload = build_answer_response(&outcome);
        assert_eq!(payload["answer"], "The importer shipped. [1]");
        assert_eq!(payload["sources"][0]["uri"], "https://example.com/standup");
        assert_eq!(payload["used_search"]["keyword"], "standup");
        assert_eq!(payload["used_search"]["order_by"], "date desc");
        assert!(payload["used_search"].get("filter").is_none());
        assert_eq!(payload["results_considered"], 3);
    }

    #[test]
    fn diagram_response_carries_the_dialect() {
        let outcome = DiagramOutcome {
            code: "```mermaid\nflowchart TD\n```".into(),
            kind: DiagramKind::Flowchart,
            params: SearchParameters::from_keyword("deploy"),
            results_considered: 0,
        };

        let payload = build_diagram_response(&outcome);
        assert_eq!(payload["chart_type"], "flowchart");
        assert!(
            payload["code"]
                .as_str()
                .expect("code string")
                .starts_with("```mermaid")
        );
    }
}
