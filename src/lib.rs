#![deny(missing_docs)]

//! Core library for the ragbridge MCP server.

/// Environment-driven configuration management.
pub mod config;
/// Generative-text backend abstraction and the Gemini adapter.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Retrieval-augmented generation pipeline orchestration.
pub mod pipeline;
/// Vertex AI Search (Discovery Engine) integration.
pub mod search;
