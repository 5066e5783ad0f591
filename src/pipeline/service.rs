//! Service coordinating query interpretation, search, and grounded generation.

use crate::{
    config::get_config,
    generation::{GenerationClient, GenerationRequest, get_generation_client},
    pipeline::{
        composer::{dedupe_sources, has_grounding},
        interpreter::{build_interpreter_prompt, parse_search_parameters},
        prompts::{build_answer_prompt, build_diagram_prompt, build_slide_prompt},
        types::{
            AnswerOutcome, DiagramKind, DiagramOutcome, GeneratedAnswer, PipelineError,
            SlideDraftOutcome,
        },
    },
    search::{SearchBackendError, SearchParameters, SearchResultItem, VertexSearchClient},
};

/// Coordinates the full request pipeline: interpret, search, and compose.
///
/// The service owns long-lived handles to the search and generation clients so
/// every MCP tool reuses the same components. Construct the service once near
/// process start and share it through an `Arc`.
pub struct RagService {
    pub(crate) search_client: VertexSearchClient,
    pub(crate) generation_client: Box<dyn GenerationClient + Send + Sync>,
}

impl RagService {
    /// Build a new service from the process-wide configuration.
    pub fn new() -> Result<Self, SearchBackendError> {
        tracing::info!("Initializing RAG pipeline");
        Ok(Self {
            search_client: VertexSearchClient::new()?,
            generation_client: get_generation_client(),
        })
    }

    /// Turn a free-text query into structured search parameters.
    ///
    /// One generation call with a fixed instruction prompt; an unparseable
    /// response degrades to searching for the raw query. Transport failures
    /// still surface as [`PipelineError::Generation`].
    pub async fn interpret(&self, query: &str) -> Result<SearchParameters, PipelineError> {
        let query = validated_query(query)?;

        let raw = self
            .generation_client
            .generate(GenerationRequest {
                model: get_config().gemini_model.clone(),
                prompt: build_interpreter_prompt(query),
            })
            .await?;

        let params = parse_search_parameters(query, &raw);
        tracing::debug!(
            keyword = %params.keyword,
            order_by = ?params.order_by,
            filter = ?params.filter,
            "Interpreted query"
        );
        Ok(params)
    }

    /// Issue one search call for the supplied parameters.
    ///
    /// An empty result list is a valid outcome, distinguishable from a backend
    /// error.
    pub async fn search(
        &self,
        params: &SearchParameters,
    ) -> Result<Vec<SearchResultItem>, PipelineError> {
        if params.keyword.trim().is_empty() {
            return Err(PipelineError::InvalidInput(
                "search keyword must not be empty".into(),
            ));
        }
        Ok(self.search_client.search(params).await?)
    }

    /// Generate a grounded answer with deduplicated citations.
    pub async fn compose_answer(
        &self,
        query: &str,
        results: &[SearchResultItem],
    ) -> Result<GeneratedAnswer, PipelineError> {
        let query = validated_query(query)?;
        let text = self.generate(build_answer_prompt(query, results)).await?;

        let sources = if has_grounding(results) {
            dedupe_sources(results)
        } else {
            Vec::new()
        };

        Ok(GeneratedAnswer { text, sources })
    }

    /// Generate a 5-8 slide Marp outline; the raw backend text is the artifact.
    pub async fn compose_slide_draft(
        &self,
        query: &str,
        results: &[SearchResultItem],
    ) -> Result<String, PipelineError> {
        let query = validated_query(query)?;
        self.generate(build_slide_prompt(query, results)).await
    }

    /// Generate a Mermaid code block in the requested dialect.
    pub async fn compose_diagram(
        &self,
        query: &str,
        results: &[SearchResultItem],
        kind: DiagramKind,
    ) -> Result<String, PipelineError> {
        let query = validated_query(query)?;
        self.generate(build_diagram_prompt(query, results, kind))
            .await
    }

    /// Run the full `search_documents` pipeline.
    pub async fn answer_query(&self, query: &str) -> Result<AnswerOutcome, PipelineError> {
        let params = self.interpret(query).await?;
        let results = self.search(&params).await?;
        let answer = self.compose_answer(query, &results).await?;
        tracing::info!(
            keyword = %params.keyword,
            results = results.len(),
            sources = answer.sources.len(),
            "Answered query"
        );
        Ok(AnswerOutcome {
            answer,
            params,
            results_considered: results.len(),
        })
    }

    /// Run the full `generate_slide_draft` pipeline.
    pub async fn draft_slides(&self, query: &str) -> Result<SlideDraftOutcome, PipelineError> {
        let params = self.interpret(query).await?;
        let results = self.search(&params).await?;
        let markdown = self.compose_slide_draft(query, &results).await?;
        tracing::info!(keyword = %params.keyword, results = results.len(), "Drafted slides");
        Ok(SlideDraftOutcome {
            markdown,
            params,
            results_considered: results.len(),
        })
    }

    /// Run the full `generate_diagram` pipeline.
    pub async fn draft_diagram(
        &self,
        query: &str,
        kind: DiagramKind,
    ) -> Result<DiagramOutcome, PipelineError> {
        let params = self.interpret(query).await?;
        let results = self.search(&params).await?;
        let code = self.compose_diagram(query, &results, kind).await?;
        tracing::info!(
            keyword = %params.keyword,
            kind = kind.as_str(),
            results = results.len(),
            "Drafted diagram"
        );
        Ok(DiagramOutcome {
            code,
            kind,
            params,
            results_considered: results.len(),
        })
    }

    async fn generate(&self, prompt: String) -> Result<String, PipelineError> {
        let text = self
            .generation_client
            .generate(GenerationRequest {
                model: get_config().gemini_model.clone(),
                prompt,
            })
            .await?;
        Ok(text)
    }
}

/// Reject empty or whitespace-only queries before any backend call.
fn validated_query(query: &str) -> Result<&str, PipelineError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::InvalidInput(
            "query must not be empty".into(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationClientError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub generation client returning canned responses in call order.
    struct ScriptedGeneration {
        responses: Mutex<Vec<Result<String, GenerationClientError>>>,
    }

    impl ScriptedGeneration {
        fn new(responses: Vec<Result<String, GenerationClientError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedGeneration {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<String, GenerationClientError> {
            self.responses
                .lock()
                .expect("responses lock")
                .remove(0)
        }
    }

    fn ensure_test_config() {
        use crate::config::{CONFIG, Config};
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = CONFIG.set(Config {
                gcp_project_id: "test-project".into(),
                gcp_location: "global".into(),
                engine_id: "test-engine".into(),
                gemini_model: "gemini-test".into(),
                gemini_location: "us-central1".into(),
                access_token: None,
                search_page_size: None,
                search_endpoint: Some("http://127.0.0.1:1/search".into()),
                generation_endpoint: Some("http://127.0.0.1:1".into()),
            });
        });
    }

    fn service_with(responses: Vec<Result<String, GenerationClientError>>) -> RagService {
        ensure_test_config();
        RagService {
            search_client: VertexSearchClient::new().expect("search client"),
            generation_client: Box::new(ScriptedGeneration::new(responses)),
        }
    }

    fn item(title: &str, uri: &str, snippet: &str) -> SearchResultItem {
        SearchResultItem {
            title: title.into(),
            uri: uri.into(),
            snippet: snippet.into(),
        }
    }

    #[tokio::test]
    async fn interpret_rejects_empty_query_without_backend_call() {
        let service = service_with(vec![]);
        let error = service.interpret("   ").await.expect_err("invalid input");
        assert!(matches!(error, PipelineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn interpret_falls_back_on_unparseable_response() {
        let service = service_with(vec![Ok("no json here".into())]);
        let params = service
            .interpret("latest standup summary")
            .await
            .expect("params");
        assert_eq!(params.keyword, "latest standup summary");
        assert!(params.order_by.is_none());
    }

    #[tokio::test]
    async fn interpret_surfaces_transport_failures() {
        let service = service_with(vec![Err(GenerationClientError::ProviderUnavailable(
            "down".into(),
        ))]);
        let error = service
            .interpret("latest standup summary")
            .await
            .expect_err("generation error");
        assert!(matches!(error, PipelineError::Generation(_)));
    }

    #[tokio::test]
    async fn compose_answer_dedupes_sources_in_order() {
        let service = service_with(vec![Ok("The importer shipped. [1]".into())]);
        let results = vec![
            item("Doc A", "https://example.com/a", "Shipped the importer."),
            item("Doc A dup", "https://example.com/a", "More notes."),
            item("Doc B", "https://example.com/b", "Follow-up."),
        ];

        let answer = service
            .compose_answer("what shipped?", &results)
            .await
            .expect("answer");

        assert_eq!(answer.text, "The importer shipped. [1]");
        assert_eq!(answer.sources.len(), 2);
        assert_eq!(answer.sources[0].uri, "https://example.com/a");
        assert_eq!(answer.sources[1].uri, "https://example.com/b");
    }

    #[tokio::test]
    async fn compose_answer_returns_no_sources_without_grounding() {
        let service = service_with(vec![Ok(
            "No internal documents were available; generally speaking...".into(),
        )]);

        let answer = service
            .compose_answer("what shipped?", &[])
            .await
            .expect("answer");

        assert!(answer.sources.is_empty());
        assert!(!answer.text.is_empty());

        let blank = vec![item("Doc", "https://example.com/a", "  ")];
        let service = service_with(vec![Ok("General answer.".into())]);
        let answer = service
            .compose_answer("what shipped?", &blank)
            .await
            .expect("answer");
        assert!(answer.sources.is_empty());
    }

    #[tokio::test]
    async fn search_guards_against_empty_keyword() {
        let service = service_with(vec![]);
        let error = service
            .search(&SearchParameters::from_keyword("  "))
            .await
            .expect_err("invalid input");
        assert!(matches!(error, PipelineError::InvalidInput(_)));
    }
}
