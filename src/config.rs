use std::env;
use std::time::Duration;
use thiserror::Error;

/// Upload endpoint used when `UPLOAD_URL` is not set.
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:8001/upload_document";
/// Upload request bound used when `UPLOAD_TIMEOUT_SECS` is not set.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;
/// Embedding model used when `EMBEDDING_MODEL` is not set.
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/text-embedding-004";
/// Generation model used when `GEMINI_GENERATION_MODEL` is not set.
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Neither credential source carried an API key.
    #[error("GEMINI_API_KEY or VERTEX_AI must be set in environment variables")]
    MissingCredential,
}

/// Runtime configuration shared by the upload tester and the embedding service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Primary Gemini API key.
    pub gemini_api_key: Option<String>,
    /// Secondary credential source, consulted when `gemini_api_key` is unset.
    pub vertex_ai: Option<String>,
    /// Embedding model identifier passed to the provider.
    pub embedding_model: String,
    /// Preferred generation model for answers.
    pub generation_model: String,
    /// Optional override for the generative-language API base URL.
    pub gemini_base_url: Option<String>,
    /// Document upload endpoint exercised by the upload tester.
    pub upload_url: String,
    /// Upper bound on a single upload round trip.
    pub upload_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            vertex_ai: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            gemini_base_url: None,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            gemini_api_key: load_env_optional("GEMINI_API_KEY"),
            vertex_ai: load_env_optional("VERTEX_AI"),
            embedding_model: load_env_optional("EMBEDDING_MODEL")
                .unwrap_or(defaults.embedding_model),
            generation_model: load_env_optional("GEMINI_GENERATION_MODEL")
                .unwrap_or(defaults.generation_model),
            gemini_base_url: load_env_optional("GEMINI_BASE_URL"),
            upload_url: load_env_optional("UPLOAD_URL").unwrap_or(defaults.upload_url),
            upload_timeout: load_env_optional("UPLOAD_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .parse()
                        .map(Duration::from_secs)
                        .map_err(|_| ConfigError::InvalidValue("UPLOAD_TIMEOUT_SECS".into()))
                })
                .transpose()?
                .unwrap_or(defaults.upload_timeout),
        })
    }

    /// Resolve the API key, preferring `GEMINI_API_KEY` over `VERTEX_AI`.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        [&self.gemini_api_key, &self.vertex_ai]
            .into_iter()
            .filter_map(|value| value.as_deref())
            .find(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingCredential)
    }
}

/// Read `.env` (when present) and load configuration from the environment.
pub fn load() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        embedding_model = %config.embedding_model,
        generation_model = %config.generation_model,
        upload_url = %config.upload_url,
        upload_timeout_secs = config.upload_timeout.as_secs(),
        has_api_key = config.api_key().is_ok(),
        "Loaded configuration"
    );
    Ok(config)
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
