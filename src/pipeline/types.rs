//! Core data types and error definitions for the pipeline.

use crate::generation::GenerationClientError;
use crate::search::{SearchBackendError, SearchParameters};
use thiserror::Error;

/// Errors emitted while orchestrating a tool request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller-supplied input was rejected before any backend call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Search backend was unreachable or rejected the request.
    #[error("Search backend request failed: {0}")]
    Search(#[from] SearchBackendError),
    /// Generation backend was unreachable or rejected the request.
    #[error("Generation backend request failed: {0}")]
    Generation(#[from] GenerationClientError),
}

/// One cited source attached to a generated answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    /// Document title reported by the search backend.
    pub title: String,
    /// Link to the source document.
    pub uri: String,
}

/// Terminal artifact of the answer pipeline.
#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    /// Generated answer text.
    pub text: String,
    /// Cited sources, deduplicated by URI in first-seen order.
    pub sources: Vec<SourceRef>,
}

/// Supported Mermaid diagram dialects for the `generate_diagram` tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagramKind {
    /// Top-down or left-right flowchart.
    Flowchart,
    /// Sequence diagram.
    Sequence,
    /// Mind map.
    Mindmap,
    /// Class diagram.
    ClassDiagram,
    /// State transition diagram.
    StateDiagram,
    /// Entity-relationship diagram.
    ErDiagram,
    /// Gantt chart.
    Gantt,
}

impl DiagramKind {
    /// Stable wire names accepted by the tool surface, in schema order.
    pub const ALL: [&'static str; 7] = [
        "flowchart",
        "sequence",
        "mindmap",
        "classDiagram",
        "stateDiagram",
        "erDiagram",
        "gantt",
    ];

    /// Wire name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequence",
            Self::Mindmap => "mindmap",
            Self::ClassDiagram => "classDiagram",
            Self::StateDiagram => "stateDiagram",
            Self::ErDiagram => "erDiagram",
            Self::Gantt => "gantt",
        }
    }
}

impl std::str::FromStr for DiagramKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flowchart" => Ok(Self::Flowchart),
            "sequence" => Ok(Self::Sequence),
            "mindmap" => Ok(Self::Mindmap),
            "classDiagram" => Ok(Self::ClassDiagram),
            "stateDiagram" => Ok(Self::StateDiagram),
            "erDiagram" => Ok(Self::ErDiagram),
            "gantt" => Ok(Self::Gantt),
            _ => Err(()),
        }
    }
}

/// Outcome of the full `search_documents` pipeline.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    /// Generated answer plus citations.
    pub answer: GeneratedAnswer,
    /// Search parameters that were actually used.
    pub params: SearchParameters,
    /// Number of retrieved results folded into the prompt.
    pub results_considered: usize,
}

/// Outcome of the full `generate_slide_draft` pipeline.
#[derive(Debug, Clone)]
pub struct SlideDraftOutcome {
    /// Marp-compatible Markdown returned by the backend, verbatim.
    pub markdown: String,
    /// Search parameters that were actually used.
    pub params: SearchParameters,
    /// Number of retrieved results folded into the prompt.
    pub results_considered: usize,
}

/// Outcome of the full `generate_diagram` pipeline.
#[derive(Debug, Clone)]
pub struct DiagramOutcome {
    /// Mermaid code block returned by the backend, verbatim.
    pub code: String,
    /// Diagram dialect that was requested.
    pub kind: DiagramKind,
    /// Search parameters that were actually used.
    pub params: SearchParameters,
    /// Number of retrieved results folded into the prompt.
    pub results_considered: usize,
}
