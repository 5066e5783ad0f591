//! Model Context Protocol (MCP) integration for ragbridge.
//!
//! This module wires the RAG pipeline into an MCP server so editors and agent
//! hosts can query internal documents over stdio. The surface area consists of:
//!
//! - Tools: `search_documents`, `generate_slide_draft`, and `generate_diagram`.
//! - Resources: `mcp://health`, `mcp://chart-types`, and `mcp://usage`.
//!
//! Handlers, schemas, and formatting helpers are kept in focused submodules to
//! make tests and reviews small and targeted.

mod format;
pub mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::RagBridgeMcpServer;
