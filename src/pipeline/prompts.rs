//! Grounding prompt construction.
//!
//! The three generation flavors (answer, slide draft, diagram) share one
//! builder: a task template wrapped around the user query and the retrieved
//! snippets, each tagged with its source index so citations map back. When no
//! usable grounding exists, the prompt switches to an answer-from-general-
//! knowledge variant that states no internal documents were found.

use crate::pipeline::composer::has_grounding;
use crate::pipeline::types::DiagramKind;
use crate::search::SearchResultItem;

/// Instructions plus output-format block for one generation flavor.
struct TaskTemplate {
    instructions: &'static str,
    output_format: String,
}

/// Build the grounded answer prompt for `search_documents`.
pub(crate) fn build_answer_prompt(query: &str, results: &[SearchResultItem]) -> String {
    build_grounded_prompt(
        &TaskTemplate {
            instructions: "Answer the question using the source documents below.\n\
                 - Base every claim on the documents; do not invent facts.\n\
                 - Cite supporting documents inline as [1], [2], matching the document tags.\n\
                 - Keep the answer concise and factual.\n",
            output_format: "Output the answer text only, no preamble.".into(),
        },
        query,
        results,
    )
}

/// Build the slide outline prompt for `generate_slide_draft`.
pub(crate) fn build_slide_prompt(query: &str, results: &[SearchResultItem]) -> String {
    build_grounded_prompt(
        &TaskTemplate {
            instructions: "Create a presentation outline about the topic using the source \
                 documents below.\n\
                 - Output Marp-compatible Markdown with slides separated by `---`.\n\
                 - The first slide carries the title and an overview.\n\
                 - Organize slide bodies as bullet points.\n\
                 - The last slide carries the summary and conclusions.\n\
                 - Produce between 5 and 8 slides.\n",
            output_format: "Output Markdown text only, no commentary. Start with the Marp \
                 front matter:\n\
                 ---\n\
                 marp: true\n\
                 theme: default\n\
                 paginate: true\n\
                 ---"
                .into(),
        },
        query,
        results,
    )
}

/// Build the Mermaid diagram prompt for `generate_diagram`.
pub(crate) fn build_diagram_prompt(
    query: &str,
    results: &[SearchResultItem],
    kind: DiagramKind,
) -> String {
    build_grounded_prompt(
        &TaskTemplate {
            instructions: "Create a diagram that explains the topic using the source \
                 documents below.\n\
                 - Output Mermaid syntax only, wrapped in a ```mermaid code block.\n\
                 - Structure the diagram for readability.\n\
                 - Make the important relationships explicit.\n",
            output_format: format!(
                "Output the ```mermaid code block only, no commentary.\n\
                 Use the {} dialect, for example:\n\
                 ```mermaid\n\
                 {}\n\
                 ```",
                kind.as_str(),
                diagram_example(kind)
            ),
        },
        query,
        results,
    )
}

fn build_grounded_prompt(
    template: &TaskTemplate,
    query: &str,
    results: &[SearchResultItem],
) -> String {
    let mut prompt = String::new();
    prompt.push_str(template.instructions);
    prompt.push('\n');

    match grounding_block(results) {
        Some(block) => {
            prompt.push_str("Source documents:\n");
            prompt.push_str(&block);
        }
        None => {
            prompt.push_str(
                "No internal documents were found for this request. Answer from general \
                 knowledge and state explicitly that no internal documents were available.\n",
            );
        }
    }

    prompt.push('\n');
    prompt.push_str("Topic:\n");
    prompt.push_str(query);
    prompt.push_str("\n\n");
    prompt.push_str(&template.output_format);
    prompt
}

/// Format retrieved snippets as an indexed document list, or `None` without grounding.
fn grounding_block(results: &[SearchResultItem]) -> Option<String> {
    if !has_grounding(results) {
        return None;
    }

    let mut block = String::new();
    for (index, item) in results.iter().enumerate() {
        block.push_str(&format!("[Document {}] {}\n", index + 1, item.title));
        if !item.uri.is_empty() {
            block.push_str(&format!("URL: {}\n", item.uri));
        }
        if !item.snippet.trim().is_empty() {
            block.push_str(&format!("Content: {}\n", item.snippet));
        }
        block.push('\n');
    }
    Some(block)
}

/// Minimal syntactically valid example for each Mermaid dialect.
fn diagram_example(kind: DiagramKind) -> &'static str {
    match kind {
        DiagramKind::Flowchart => "flowchart TD\n    A[Start] --> B{Decision}\n    B -->|Yes| C[Done]",
        DiagramKind::Sequence => "sequenceDiagram\n    Client->>Server: request\n    Server-->>Client: response",
        DiagramKind::Mindmap => "mindmap\n  root((Topic))\n    Branch A\n    Branch B",
        DiagramKind::ClassDiagram => "classDiagram\n    ClassA <|-- ClassB",
        DiagramKind::StateDiagram => "stateDiagram-v2\n    [*] --> Idle\n    Idle --> Running",
        DiagramKind::ErDiagram => "erDiagram\n    CUSTOMER ||--o{ ORDER : places",
        DiagramKind::Gantt => "gantt\n    title Plan\n    section Phase 1\n    Task A :a1, 2026-01-01, 7d",
    }
}
