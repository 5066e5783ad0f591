//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    config::get_config,
    mcp::{
        format::{
            UsageSnapshot, chart_types_payload, health_payload, json_resource_contents,
            serialize_json,
        },
        handlers::{
            diagram::handle_diagram, search::handle_search_documents, slides::handle_slide_draft,
        },
        registry, schemas,
    },
    pipeline::RagService,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, ListResourcesResult, ListToolsResult,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations,
    },
};

const HEALTH_URI: &str = "mcp://health";
const CHART_TYPES_URI: &str = "mcp://chart-types";
const USAGE_URI: &str = "mcp://usage";

/// MCP server implementation exposing the ragbridge tools.
#[derive(Clone)]
pub struct RagBridgeMcpServer {
    service: Arc<RagService>,
    registry: Arc<registry::Registry>,
}

impl RagBridgeMcpServer {
    /// Create a new MCP server using the supplied pipeline service.
    pub fn new(service: Arc<RagService>) -> Self {
        let mut registry = registry::Registry::new();
        registry.register_resource(HEALTH_URI, resource_health);
        registry.register_resource(CHART_TYPES_URI, resource_chart_types);
        registry.register_resource(USAGE_URI, resource_usage);

        registry.register_tool("search_documents", tool_search_documents);
        registry.register_tool("generate_slide_draft", tool_slide_draft);
        registry.register_tool("generate_diagram", tool_diagram);

        Self {
            service,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: Cow::Borrowed("search_documents"),
                title: Some("Search Documents".to_string()),
                description: Some(Cow::Borrowed(
                    "Search internal documents and return a grounded answer with source citations.",
                )),
                input_schema: Arc::new(schemas::search_documents_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Search Documents")
                        .read_only(true)
                        .idempotent(false)
                        .open_world(true),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("generate_slide_draft"),
                title: Some("Generate Slide Draft".to_string()),
                description: Some(Cow::Borrowed(
                    "Draft a Marp-compatible slide outline grounded on retrieved documents.",
                )),
                input_schema: Arc::new(schemas::slide_draft_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Generate Slide Draft")
                        .read_only(true)
                        .idempotent(false)
                        .open_world(true),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("generate_diagram"),
                title: Some("Generate Diagram".to_string()),
                description: Some(Cow::Borrowed(
                    "Generate Mermaid diagram code (flowchart, sequence, mindmap, and more) grounded on retrieved documents.",
                )),
                input_schema: Arc::new(schemas::diagram_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Generate Diagram")
                        .read_only(true)
                        .idempotent(false)
                        .open_world(true),
                ),
                icons: None,
            },
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut health = RawResource::new(HEALTH_URI, "health");
        health.description = Some("Effective search and generation backend configuration".into());

        let mut chart_types = RawResource::new(CHART_TYPES_URI, "chart-types");
        chart_types.description =
            Some("Diagram dialects accepted by generate_diagram and the default selection".into());

        let mut usage = RawResource::new(USAGE_URI, "usage");
        usage.description = Some(
            "Recommended tool flow: search_documents for answers, generate_slide_draft and generate_diagram for artifacts."
                .into(),
        );

        vec![
            health.no_annotation(),
            chart_types.no_annotation(),
            usage.no_annotation(),
        ]
    }
}

fn resource_health(
    _server: &RagBridgeMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        let config = get_config();
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(HEALTH_URI, health_payload(config))],
        })
    })
}

fn resource_chart_types(
    _server: &RagBridgeMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                CHART_TYPES_URI,
                chart_types_payload(),
            )],
        })
    })
}

fn resource_usage(
    _server: &RagBridgeMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        let usage = UsageSnapshot {
            title: "ragbridge MCP usage".into(),
            policy: vec![
                "Ask natural-language questions with search_documents; answers cite their sources.".into(),
                "Recency wording (latest, most recent) automatically sorts results by date.".into(),
                "Use generate_slide_draft for a Marp outline of a topic.".into(),
                "Use generate_diagram with an optional chart_type for Mermaid code.".into(),
            ],
        };
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                USAGE_URI,
                serialize_json(&usage, USAGE_URI),
            )],
        })
    })
}

fn tool_search_documents(
    server: &RagBridgeMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_search_documents(&service, request.arguments).await })
}

fn tool_slide_draft(
    server: &RagBridgeMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_slide_draft(&service, request.arguments).await })
}

fn tool_diagram(server: &RagBridgeMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_diagram(&service, request.arguments).await })
}

impl ServerHandler for RagBridgeMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "ragbridge".to_string();
        implementation.title = Some("Ragbridge MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to answer questions from internal documents with citations, and to turn retrieved material into slide outlines or Mermaid diagrams.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = request.uri.clone();
            if let Some(handler) = self.registry.resources.get(uri.as_str()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {uri}"),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tools.get(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}
