use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the ragbridge server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// GCP project that owns the search engine and the Gemini deployment.
    pub gcp_project_id: String,
    /// Location of the Discovery Engine search app (usually `global`).
    pub gcp_location: String,
    /// Identifier of the Discovery Engine search app (Engine).
    pub engine_id: String,
    /// Gemini model identifier used for every generation call.
    pub gemini_model: String,
    /// Vertex AI region hosting the Gemini model.
    pub gemini_location: String,
    /// Optional OAuth2 bearer token attached to backend requests.
    pub access_token: Option<String>,
    /// Optional override for the number of search results requested per call.
    pub search_page_size: Option<usize>,
    /// Optional full URL override for the search endpoint (tests/emulators).
    pub search_endpoint: Option<String>,
    /// Optional base URL override for the generation endpoint (tests/emulators).
    pub generation_endpoint: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gcp_project_id: load_env("GCP_PROJECT_ID")?,
            gcp_location: load_env_optional("GCP_LOCATION").unwrap_or_else(|| "global".into()),
            engine_id: load_env("ENGINE_ID")?,
            gemini_model: load_env_optional("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.5-flash".into()),
            gemini_location: load_env_optional("GEMINI_LOCATION")
                .unwrap_or_else(|| "us-central1".into()),
            access_token: load_env_optional("GCP_ACCESS_TOKEN"),
            search_page_size: load_env_optional("SEARCH_PAGE_SIZE")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SEARCH_PAGE_SIZE".into()))
                })
                .transpose()?,
            search_endpoint: load_env_optional("SEARCH_ENDPOINT"),
            generation_endpoint: load_env_optional("GENERATION_ENDPOINT"),
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        project = %config.gcp_project_id,
        location = %config.gcp_location,
        engine = %config.engine_id,
        model = %config.gemini_model,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
