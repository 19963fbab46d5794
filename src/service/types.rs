//! Error definitions for the embedding/answer service.

use crate::{
    config::ConfigError, embedding::EmbeddingClientError, generation::GenerationClientError,
};
use thiserror::Error;

/// Errors emitted by [`crate::service::EmbeddingService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Service could not be configured.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// HTTP client construction failed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// Embedding provider failed or returned an unusable vector.
    #[error("Failed to generate embedding: {0}")]
    Embedding(#[from] EmbeddingClientError),
    /// Model resolution or content generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationClientError),
    /// Provider refused the prompt.
    #[error("Content was blocked: {0}")]
    Blocked(String),
    /// No answer text could be located in the response.
    #[error(
        "Could not extract answer from generation response{}",
        finish_reason_suffix(.finish_reason)
    )]
    MissingAnswer {
        /// Finish reason reported by the first candidate when it was not `STOP`.
        finish_reason: Option<String>,
    },
    /// Answer text was present but blank.
    #[error("Generated answer is empty")]
    EmptyAnswer,
}

fn finish_reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|reason| format!(" (finish reason: {reason})"))
        .unwrap_or_default()
}
