//! Embedding client abstraction and response normalization.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

mod shape;

pub use shape::{EmbeddingShape, normalize_embedding};

/// Errors raised by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingClientError {
    /// Provider could not be reached or the request failed in transit.
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),
    /// Provider answered with a non-success status.
    #[error("Unexpected embedding response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the provider.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response did not carry a vector in any recognized shape.
    #[error("Unexpected embedding format: {0}")]
    UnrecognizedShape(String),
}

/// Retrieval role of the embedded text; providers may optimize each differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// Text stored in the index.
    RetrievalDocument,
    /// Text used to search the index.
    RetrievalQuery,
}

impl TaskType {
    /// Wire label understood by the provider.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            Self::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

/// Interface implemented by embedding backends.
///
/// Implementations return the provider's raw JSON body; callers pass it through
/// [`normalize_embedding`] to obtain a flat vector.
#[async_trait]
pub trait EmbeddingClient {
    /// Request an embedding for `content` using `model`.
    async fn embed_content(
        &self,
        model: &str,
        content: &str,
        task_type: TaskType,
    ) -> Result<Value, EmbeddingClientError>;
}
