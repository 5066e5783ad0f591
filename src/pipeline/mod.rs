//! Retrieval-augmented generation pipeline.
//!
//! Each tool call runs the same straight pipeline: interpret the free-text
//! query into [`crate::search::SearchParameters`], issue one search call, and
//! fold the returned snippets into a grounding prompt for the generative
//! backend. No state survives a request beyond the process-wide configuration
//! captured by [`RagService`] at construction.

mod composer;
mod interpreter;
mod prompts;
pub mod service;
pub mod types;

pub use service::RagService;
pub use types::{
    AnswerOutcome, DiagramKind, DiagramOutcome, GeneratedAnswer, PipelineError, SlideDraftOutcome,
    SourceRef,
};
