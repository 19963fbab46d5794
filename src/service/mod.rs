//! Embedding and answer-generation service used by the contract search flow.
//!
//! The service turns extracted document metadata and free-text queries into embedding vectors
//! and answers questions over retrieved contract excerpts. Each operation is a single
//! request/response exchange with the provider; the only retry is the ordered fallback across
//! alternative generation models when the configured one cannot be initialized.

use crate::{
    config::Config,
    embedding::{EmbeddingClient, TaskType, normalize_embedding},
    gemini::GeminiClient,
    generation::{GenerationClient, GenerationClientError, GenerativeModel, types::model_id},
    metadata::embedding_text,
};
use serde_json::{Map, Value};
use std::sync::Arc;

mod answer;
mod prompt;
mod types;

pub use answer::extract_answer;
pub use prompt::{NO_CONTEXT_ANSWER, build_prompt};
pub use types::ServiceError;

/// Generation models tried, in order, when the configured model fails to initialize.
pub const FALLBACK_GENERATION_MODELS: [&str; 3] =
    ["gemini-1.5-pro", "gemini-1.5-flash", "gemini-pro"];

/// Embedding and answer generation backed by pluggable provider clients.
pub struct EmbeddingService {
    embedder: Arc<dyn EmbeddingClient + Send + Sync>,
    generator: Arc<dyn GenerationClient + Send + Sync>,
    embedding_model: String,
    generation_model: String,
}

impl EmbeddingService {
    /// Build a Gemini-backed service, failing fast when no API key is configured.
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let api_key = config.api_key().inspect_err(|error| {
            tracing::error!(%error, "Embedding service is missing credentials");
        })?;
        let client = Arc::new(GeminiClient::new(
            api_key,
            config.gemini_base_url.as_deref(),
        )?);
        Ok(Self::with_clients(
            client.clone(),
            client,
            &config.embedding_model,
            &config.generation_model,
        ))
    }

    /// Assemble a service from explicit provider clients.
    pub fn with_clients(
        embedder: Arc<dyn EmbeddingClient + Send + Sync>,
        generator: Arc<dyn GenerationClient + Send + Sync>,
        embedding_model: &str,
        generation_model: &str,
    ) -> Self {
        Self {
            embedder,
            generator,
            embedding_model: embedding_model.to_string(),
            generation_model: generation_model.to_string(),
        }
    }

    /// Embed a metadata record as a retrieval document.
    pub async fn embed_metadata(
        &self,
        metadata: &Map<String, Value>,
    ) -> Result<Vec<f32>, ServiceError> {
        let text = embedding_text(metadata);
        self.embed(&text, TaskType::RetrievalDocument)
            .await
            .inspect_err(|error| tracing::error!(%error, "Error vectorizing metadata"))
    }

    /// Embed a search query.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, ServiceError> {
        self.embed(query, TaskType::RetrievalQuery)
            .await
            .inspect_err(|error| tracing::error!(%error, "Error vectorizing query"))
    }

    async fn embed(&self, text: &str, task_type: TaskType) -> Result<Vec<f32>, ServiceError> {
        let body = self
            .embedder
            .embed_content(&self.embedding_model, text, task_type)
            .await?;
        let vector = normalize_embedding(body)?;
        tracing::info!(
            dimensions = vector.len(),
            task_type = task_type.as_str(),
            "Generated embedding"
        );
        Ok(vector)
    }

    /// Answer `query` from retrieved contract excerpts.
    ///
    /// Returns [`NO_CONTEXT_ANSWER`] without contacting the provider when `context_texts` is
    /// empty. `contract_ids` is matched to `context_texts` by position.
    pub async fn generate_answer(
        &self,
        query: &str,
        context_texts: &[String],
        contract_ids: Option<&[String]>,
    ) -> Result<String, ServiceError> {
        if context_texts.is_empty() {
            tracing::warn!("No context texts provided for answer generation");
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        self.answer_from_context(query, context_texts, contract_ids)
            .await
            .inspect_err(|error| tracing::error!(%error, "Error generating answer"))
    }

    async fn answer_from_context(
        &self,
        query: &str,
        context_texts: &[String],
        contract_ids: Option<&[String]>,
    ) -> Result<String, ServiceError> {
        let prompt = build_prompt(query, context_texts, contract_ids);
        let model = self.resolve_generation_model().await?;

        tracing::info!(model = %model.name, excerpts = context_texts.len(), "Generating answer");
        let response = self.generator.generate_content(&model, &prompt).await?;
        let answer = extract_answer(&response)?;
        tracing::info!(model = %model.name, "Successfully generated answer");
        Ok(answer)
    }

    /// Initialize the configured model, falling back through [`FALLBACK_GENERATION_MODELS`].
    ///
    /// When every candidate fails, the error from the configured model is returned.
    async fn resolve_generation_model(&self) -> Result<GenerativeModel, GenerationClientError> {
        let primary = self.generation_model.as_str();
        tracing::info!(model = primary, "Attempting to use model");

        let primary_error = match self.generator.load_model(primary).await {
            Ok(model) => return Ok(model),
            Err(error) => error,
        };
        tracing::error!(model = primary, error = %primary_error, "Error initializing model");

        for alternative in FALLBACK_GENERATION_MODELS
            .into_iter()
            .filter(|alternative| *alternative != model_id(primary))
        {
            tracing::info!(model = alternative, "Trying alternative model");
            match self.generator.load_model(alternative).await {
                Ok(model) => {
                    tracing::info!(model = alternative, "Successfully initialized model");
                    return Ok(model);
                }
                Err(error) => {
                    tracing::debug!(model = alternative, %error, "Alternative model unavailable");
                }
            }
        }

        Err(primary_error)
    }
}
