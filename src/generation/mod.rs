//! Abstractions for the generative-text backend.
//!
//! Every generation-flavored operation (parameter extraction, grounded answers,
//! slide drafts, diagrams) funnels through one [`GenerationClient`]. The Gemini
//! adapter issues HTTP requests directly against the Vertex AI REST surface,
//! mirroring how the search client talks to Discovery Engine.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced while requesting text generation.
#[derive(Debug, Error)]
pub enum GenerationClientError {
    /// Provider endpoint was unreachable.
    #[error("Generation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate content: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the generation provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fully qualified model identifier understood by the provider.
    pub model: String,
    /// Prompt assembled by the pipeline.
    pub prompt: String,
}

/// Interface implemented by generative-text providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for the supplied prompt using the requested model.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationClientError>;
}

/// Build a generation client based on configuration.
pub fn get_generation_client() -> Box<dyn GenerationClient + Send + Sync> {
    let config = get_config();
    let base_url = config
        .generation_endpoint
        .clone()
        .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", config.gemini_location));
    Box::new(GeminiClient::new(
        base_url,
        config.gcp_project_id.clone(),
        config.gemini_location.clone(),
        config.access_token.clone(),
    ))
}

struct GeminiClient {
    http: Client,
    base_url: String,
    project_id: String,
    location: String,
    auth_token: Option<String>,
}

impl GeminiClient {
    fn new(
        base_url: String,
        project_id: String,
        location: String,
        auth_token: Option<String>,
    ) -> Self {
        let http = Client::builder()
            .user_agent("ragbridge/generation")
            .build()
            .expect("Failed to construct reqwest::Client for generation");
        Self {
            http,
            base_url,
            project_id,
            location,
            auth_token,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.location,
            model
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationClientError> {
        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [ { "text": request.prompt } ],
                }
            ],
            "generationConfig": {
                // Low temperature keeps parameter extraction and citations stable.
                "temperature": 0.2,
            }
        });

        let endpoint = self.endpoint(&request.model);
        let mut builder = self.http.post(&endpoint).json(&payload);
        if let Some(token) = &self.auth_token
            && !token.is_empty()
        {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|error| {
            GenerationClientError::ProviderUnavailable(format!(
                "failed to reach generation backend at {}: {error}",
                self.base_url
            ))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationClientError::ProviderUnavailable(format!(
                "generation endpoint {endpoint} returned 404"
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationClientError::GenerationFailed(format!(
                "generation backend returned {status}: {body}"
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|error| {
            GenerationClientError::InvalidResponse(format!(
                "failed to decode generation response: {error}"
            ))
        })?;

        let text = body
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(GenerationClientError::InvalidResponse(
                "generation backend returned no candidate text".into(),
            ));
        }

        Ok(text.trim().to_string())
    }
}
