//! HTTP client for the Gemini generative-language REST API.
//!
//! Implements both [`EmbeddingClient`] and [`GenerationClient`] against `v1beta`. The API key
//! travels in the `x-goog-api-key` header rather than the query string so it never shows up
//! in request URLs or logs.

use crate::embedding::{EmbeddingClient, EmbeddingClientError, TaskType};
use crate::generation::{
    GenerateContentResponse, GenerationClient, GenerationClientError, GenerativeModel,
    types::model_id,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};

/// Public endpoint used when no base URL override is configured.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";

/// Thin Gemini REST client.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Construct a client; `base_url` defaults to [`DEFAULT_BASE_URL`].
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>) -> Result<Self, reqwest::Error> {
        let http = Client::builder().user_agent("docrag/0.1").build()?;
        let base_url = base_url
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        tracing::debug!(url = %base_url, "Initialized Gemini HTTP client");
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn model_endpoint(&self, model: &str, action: Option<&str>) -> String {
        let id = model_id(model);
        match action {
            Some(action) => format!("{}/{API_VERSION}/models/{id}:{action}", self.base_url),
            None => format!("{}/{API_VERSION}/models/{id}", self.base_url),
        }
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("x-goog-api-key", &self.api_key)
    }
}

async fn failure_parts(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

#[async_trait]
impl EmbeddingClient for GeminiClient {
    async fn embed_content(
        &self,
        model: &str,
        content: &str,
        task_type: TaskType,
    ) -> Result<Value, EmbeddingClientError> {
        let payload = json!({
            "model": format!("models/{}", model_id(model)),
            "content": { "parts": [{ "text": content }] },
            "taskType": task_type,
        });

        let response = self
            .request(Method::POST, self.model_endpoint(model, Some("embedContent")))
            .json(&payload)
            .send()
            .await
            .map_err(|error| EmbeddingClientError::RequestFailed(error.to_string()))?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(EmbeddingClientError::UnexpectedStatus { status, body });
        }

        response
            .json()
            .await
            .map_err(|error| EmbeddingClientError::UnrecognizedShape(error.to_string()))
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn load_model(&self, name: &str) -> Result<GenerativeModel, GenerationClientError> {
        let response = self
            .request(Method::GET, self.model_endpoint(name, None))
            .send()
            .await
            .map_err(|error| GenerationClientError::RequestFailed(error.to_string()))?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(GenerationClientError::ModelUnavailable {
                model: name.to_string(),
                reason: format!("{status}: {body}"),
            });
        }

        response.json().await.map_err(|error| {
            GenerationClientError::InvalidResponse(format!("failed to decode model: {error}"))
        })
    }

    async fn generate_content(
        &self,
        model: &GenerativeModel,
        prompt: &str,
    ) -> Result<GenerateContentResponse, GenerationClientError> {
        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        let response = self
            .request(
                Method::POST,
                self.model_endpoint(&model.name, Some("generateContent")),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|error| GenerationClientError::RequestFailed(error.to_string()))?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(GenerationClientError::UnexpectedStatus { status, body });
        }

        response.json().await.map_err(|error| {
            GenerationClientError::InvalidResponse(format!(
                "failed to decode generation response: {error}"
            ))
        })
    }
}
