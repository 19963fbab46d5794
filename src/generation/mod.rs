//! Abstractions for answer generation via hosted language models.
//!
//! A model is resolved ("initialized") before content is generated so callers can fall back
//! to alternative model identifiers when the preferred one is unavailable.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

pub mod types;

pub use types::{Candidate, Content, GenerateContentResponse, GenerativeModel, Part, PromptFeedback};

/// Errors surfaced while resolving models or generating content.
#[derive(Debug, Error)]
pub enum GenerationClientError {
    /// Model identifier could not be resolved by the provider.
    #[error("Could not initialize model '{model}': {reason}")]
    ModelUnavailable {
        /// Identifier that was requested.
        model: String,
        /// Provider explanation.
        reason: String,
    },
    /// Provider could not be reached or the request failed in transit.
    #[error("Generation request failed: {0}")]
    RequestFailed(String),
    /// Provider returned an error response.
    #[error("Unexpected generation response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the provider.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by text-generation providers.
#[async_trait]
pub trait GenerationClient {
    /// Resolve a model identifier into a handle usable for generation.
    async fn load_model(&self, name: &str) -> Result<GenerativeModel, GenerationClientError>;

    /// Generate a response for a single-turn prompt.
    async fn generate_content(
        &self,
        model: &GenerativeModel,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GenerationClientError>;
}
