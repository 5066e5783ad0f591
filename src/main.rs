//! MCP server entrypoint (stdio transport).
//!
//! Launches an MCP server that exposes the ragbridge tools over stdio for
//! editor/agent integrations (Cursor, Claude Desktop, Codex CLI, etc.).
use anyhow::{Context, Result};
use ragbridge::{config, logging, mcp::RagBridgeMcpServer, pipeline::RagService};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing();

    let service = Arc::new(RagService::new().context("failed to initialize RAG pipeline")?);
    let server = RagBridgeMcpServer::new(service);

    let running = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    running
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
