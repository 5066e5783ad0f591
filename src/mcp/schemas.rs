//! JSON schema builders for MCP tools.

use crate::pipeline::DiagramKind;
use serde_json::{Map, Value};

/// Build the schema describing the `search_documents` tool input.
pub(crate) fn search_documents_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "query".into(),
        string_schema("Search keywords or a natural-language question"),
    );
    finalize_object_schema(properties, &["query"])
}

/// Build the schema describing the `generate_slide_draft` tool input.
pub(crate) fn slide_draft_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "query".into(),
        string_schema("Topic or request the slide outline should cover"),
    );
    finalize_object_schema(properties, &["query"])
}

/// Build the schema describing the `generate_diagram` tool input.
pub(crate) fn diagram_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "query".into(),
        string_schema("Topic or process the diagram should explain"),
    );

    let mut chart_schema = Map::new();
    chart_schema.insert("type".into(), Value::String("string".into()));
    chart_schema.insert(
        "description".into(),
        Value::String("Diagram dialect; defaults to 'flowchart'.".into()),
    );
    chart_schema.insert(
        "enum".into(),
        Value::Array(
            DiagramKind::ALL
                .into_iter()
                .map(|variant| Value::String(variant.into()))
                .collect(),
        ),
    );
    chart_schema.insert("default".into(), Value::String("flowchart".into()));
    properties.insert("chart_type".into(), Value::Object(chart_schema));

    finalize_object_schema(properties, &["query"])
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagram_schema_enumerates_all_kinds_with_default() {
        let schema = diagram_input_schema();
        let chart = schema["properties"]["chart_type"]
            .as_object()
            .expect("chart_type schema");
        assert_eq!(chart["default"], "flowchart");
        let variants = chart["enum"].as_array().expect("enum");
        assert_eq!(variants.len(), 7);
        assert!(variants.contains(&Value::String("stateDiagram".into())));
    }

    #[test]
    fn query_is_the_only_required_field() {
        for schema in [
            search_documents_input_schema(),
            slide_draft_input_schema(),
            diagram_input_schema(),
        ] {
            let required = schema["required"].as_array().expect("required");
            assert_eq!(required, &vec![Value::String("query".into())]);
            assert_eq!(schema["additionalProperties"], Value::Bool(false));
        }
    }
}
