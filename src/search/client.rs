//! HTTP client wrapper for Discovery Engine search requests.

use crate::config::get_config;
use crate::search::extract::map_document;
use crate::search::types::{
    SearchBackendError, SearchParameters, SearchResponse, SearchResultItem,
};
use reqwest::Client;
use serde_json::{Value, json};

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// Backend messages that identify a rejected filter/sort expression.
///
/// Interpreter-produced expressions are best-effort; when the backend rejects
/// one, the request is retried once without it instead of failing the call.
const FILTER_ERRORS: [&str; 4] = [
    "Unsupported field",
    "Invalid filter syntax",
    "Unsupported rhs value",
    "Parsing filter failed",
];

/// Lightweight HTTP client for Discovery Engine search operations.
pub struct VertexSearchClient {
    pub(crate) client: Client,
    pub(crate) endpoint: String,
    pub(crate) auth_token: Option<String>,
    pub(crate) page_size: usize,
}

impl VertexSearchClient {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, SearchBackendError> {
        let config = get_config();
        let client = Client::builder().user_agent("ragbridge/0.1").build()?;

        let endpoint = match &config.search_endpoint {
            Some(url) => url.clone(),
            None => build_search_endpoint(
                &config.gcp_project_id,
                &config.gcp_location,
                &config.engine_id,
            ),
        };
        reqwest::Url::parse(&endpoint)
            .map_err(|err| SearchBackendError::InvalidUrl(err.to_string()))?;

        let page_size = config
            .search_page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        tracing::debug!(
            endpoint = %endpoint,
            page_size,
            has_token = config.access_token.is_some(),
            "Initialized search client"
        );

        Ok(Self {
            client,
            endpoint,
            auth_token: config.access_token.clone(),
            page_size,
        })
    }

    /// Issue one search request, mapping the backend schema into ordered result items.
    ///
    /// An empty result list is a valid outcome and is returned as `Ok(vec![])`.
    pub async fn search(
        &self,
        params: &SearchParameters,
    ) -> Result<Vec<SearchResultItem>, SearchBackendError> {
        let body = build_search_body(params, self.page_size);
        let response = self.post(&body).await?;

        let response = if let Some(retry_body) = self.filter_fallback(&response, params) {
            tracing::warn!(
                status = %response.0,
                "Search backend rejected filter/sort expression; retrying without it"
            );
            let retried = self.post(&retry_body).await?;
            match retried {
                (status, body) if !status.is_success() => {
                    return Err(SearchBackendError::UnexpectedStatus { status, body });
                }
                ok => ok,
            }
        } else {
            match response {
                (status, body) if !status.is_success() => {
                    tracing::error!(status = %status, "Search request failed");
                    return Err(SearchBackendError::UnexpectedStatus { status, body });
                }
                ok => ok,
            }
        };

        let payload: SearchResponse = serde_json::from_str(&response.1)
            .map_err(|_| SearchBackendError::UnexpectedStatus {
                status: response.0,
                body: response.1,
            })?;

        let items: Vec<SearchResultItem> = payload
            .results
            .into_iter()
            .filter_map(|result| map_document(result.document))
            .collect();

        tracing::debug!(results = items.len(), keyword = %params.keyword, "Search completed");
        Ok(items)
    }

    async fn post(&self, body: &Value) -> Result<(reqwest::StatusCode, String), SearchBackendError> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(token) = &self.auth_token
            && !token.is_empty()
        {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Ok((status, text))
    }

    /// Build the retry body when a 400 names a filter/sort problem and one was present.
    fn filter_fallback(
        &self,
        response: &(reqwest::StatusCode, String),
        params: &SearchParameters,
    ) -> Option<Value> {
        let (status, body) = response;
        if *status != reqwest::StatusCode::BAD_REQUEST {
            return None;
        }
        if params.filter.is_none() && params.order_by.is_none() {
            return None;
        }
        if !FILTER_ERRORS.iter().any(|message| body.contains(message)) {
            return None;
        }

        let stripped = SearchParameters::from_keyword(params.keyword.clone());
        Some(build_search_body(&stripped, self.page_size))
    }
}

/// Build the serving-config `:search` endpoint for the configured engine.
fn build_search_endpoint(project_id: &str, location: &str, engine_id: &str) -> String {
    let host = if location == "global" {
        "discoveryengine.googleapis.com".to_string()
    } else {
        format!("{location}-discoveryengine.googleapis.com")
    };
    format!(
        "https://{host}/v1alpha/projects/{project_id}/locations/{location}\
         /collections/default_collection/engines/{engine_id}\
         /servingConfigs/default_serving_config:search"
    )
}

/// Assemble the search request body, requesting extractive snippets.
fn build_search_body(params: &SearchParameters, page_size: usize) -> Value {
    let mut body = json!({
        "query": params.keyword,
        "pageSize": page_size,
        "contentSearchSpec": {
            "snippetSpec": {
                "returnSnippet": true,
                "maxSnippetCount": 3,
            },
            "extractiveContentSpec": {
                "maxExtractiveAnswerCount": 2,
                "maxExtractiveSegmentCount": 3,
                "numPreviousSegments": 1,
                "numNextSegments": 1,
                "returnExtractiveSegmentScore": true,
            },
        },
        "queryExpansionSpec": { "condition": "AUTO" },
        "spellCorrectionSpec": { "mode": "AUTO" },
    });
    let obj = body
        .as_object_mut()
        .expect("search body should remain an object");

    if let Some(filter) = &params.filter {
        obj.insert("filter".into(), Value::String(filter.clone()));
    }
    if let Some(order_by) = &params.order_by {
        obj.insert("orderBy".into(), Value::String(order_by.clone()));
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn test_client(base_url: &str) -> VertexSearchClient {
        VertexSearchClient {
            client: Client::builder()
                .user_agent("ragbridge-test")
                .build()
                .expect("client"),
            endpoint: format!("{base_url}/search"),
            auth_token: None,
            page_size: 5,
        }
    }

    #[test]
    fn endpoint_uses_regional_host_outside_global() {
        let global = build_search_endpoint("proj", "global", "engine");
        assert!(global.starts_with("https://discoveryengine.googleapis.com/"));

        let regional = build_search_endpoint("proj", "eu", "engine");
        assert!(regional.starts_with("https://eu-discoveryengine.googleapis.com/"));
        assert!(regional.ends_with("default_serving_config:search"));
    }

    #[test]
    fn search_body_includes_filter_and_order_when_present() {
        let params = SearchParameters {
            keyword: "standup".into(),
            order_by: Some("date desc".into()),
            filter: Some("date >= \"2026-01-26\"".into()),
        };
        let body = build_search_body(&params, 20);
        assert_eq!(body["query"], "standup");
        assert_eq!(body["pageSize"], 20);
        assert_eq!(body["orderBy"], "date desc");
        assert_eq!(body["filter"], "date >= \"2026-01-26\"");

        let plain = build_search_body(&SearchParameters::from_keyword("standup"), 20);
        assert!(plain.get("filter").is_none());
        assert!(plain.get("orderBy").is_none());
    }

    #[tokio::test]
    async fn search_maps_results_in_backend_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/search")
                    .json_body_partial(r#"{ "query": "release notes" }"#);
                then.status(200).json_body(serde_json::json!({
                    "results": [
                        {
                            "document": {
                                "derivedStructData": {
                                    "title": "Release 2.0",
                                    "link": "https://example.com/r2",
                                    "extractive_answers": [
                                        { "content": "Added structured logging." }
                                    ]
                                }
                            }
                        },
                        {
                            "document": {
                                "derivedStructData": {
                                    "title": "Release 1.9",
                                    "link": "https://example.com/r19",
                                    "snippets": [
                                        { "snippet": "Fixed retry handling." }
                                    ]
                                }
                            }
                        }
                    ]
                }));
            })
            .await;

        let client = test_client(&server.base_url());
        let results = client
            .search(&SearchParameters::from_keyword("release notes"))
            .await
            .expect("search");

        mock.assert();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Release 2.0");
        assert_eq!(results[0].snippet, "Added structured logging.");
        assert_eq!(results[1].uri, "https://example.com/r19");
    }

    #[tokio::test]
    async fn empty_result_set_is_not_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/search");
                then.status(200).json_body(serde_json::json!({}));
            })
            .await;

        let client = test_client(&server.base_url());
        let results = client
            .search(&SearchParameters::from_keyword("nothing"))
            .await
            .expect("search");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn backend_error_surfaces_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/search");
                then.status(503).body("unavailable");
            })
            .await;

        let client = test_client(&server.base_url());
        let error = client
            .search(&SearchParameters::from_keyword("anything"))
            .await
            .expect_err("error response");

        match error {
            SearchBackendError::UnexpectedStatus { status, body } => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "unavailable");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_filter_triggers_one_retry() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/search");
                then.status(400)
                    .body("Invalid filter syntax: unexpected token");
            })
            .await;

        let client = test_client(&server.base_url());
        let params = SearchParameters {
            keyword: "standup".into(),
            order_by: Some("date desc".into()),
            filter: Some("date ~ nonsense".into()),
        };
        let error = client.search(&params).await.expect_err("still failing");

        // First call fails on the filter, the stripped retry hits the same mock.
        mock.assert_hits(2);
        assert!(matches!(
            error,
            SearchBackendError::UnexpectedStatus { status, .. }
                if status == reqwest::StatusCode::BAD_REQUEST
        ));
    }

    #[tokio::test]
    async fn bad_request_without_filter_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/search");
                then.status(400).body("Invalid filter syntax");
            })
            .await;

        let client = test_client(&server.base_url());
        let error = client
            .search(&SearchParameters::from_keyword("standup"))
            .await
            .expect_err("error response");

        mock.assert_hits(1);
        assert!(matches!(error, SearchBackendError::UnexpectedStatus { .. }));
    }
}
