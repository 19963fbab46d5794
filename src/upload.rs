//! Client for the document upload endpoint.
//!
//! A PDF is posted as multipart form data together with its document type. The endpoint
//! answers with the extracted metadata on success. Transport failures are classified so the
//! command line can tell an unreachable server apart from a slow one.

use crate::{config::Config, metadata::render_value};
use reqwest::{
    Client, StatusCode,
    multipart::{Form, Part},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{
    fmt::{self, Write as _},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use thiserror::Error;

/// Rendered values longer than this many characters are cut in reports.
pub const PREVIEW_CHARS: usize = 200;

const PDF_MIME: &str = "application/pdf";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Document schema requested from the extraction endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentType {
    /// Invoice metadata (seller, amounts, tax identifiers).
    Invoice,
    /// Contract metadata (identifier, full text, summary).
    Contract,
}

impl DocumentType {
    /// Form value sent to the endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Contract => "contract",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a document type argument is neither `invoice` nor `contract`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown document type '{0}'. Use 'invoice' or 'contract'")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invoice" => Ok(Self::Invoice),
            "contract" => Ok(Self::Contract),
            other => Err(UnknownDocumentType(other.to_string())),
        }
    }
}

/// Errors raised while uploading a document.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Local file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// Local file exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Endpoint refused or never accepted the connection.
    #[error("Could not connect to {endpoint}: {reason}")]
    Connect {
        /// Endpoint that was dialed.
        endpoint: String,
        /// Transport error detail.
        reason: String,
    },
    /// Request exceeded the configured bound.
    #[error("Request to {endpoint} timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// Endpoint that was dialed.
        endpoint: String,
        /// Bound that was exceeded.
        timeout: Duration,
    },
    /// Success response body was not the expected JSON.
    #[error("Failed to decode upload response: {0}")]
    Decode(String),
    /// Any other HTTP failure.
    #[error("Upload request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// JSON body returned by the endpoint on success.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    /// Human-readable status message.
    #[serde(default)]
    pub message: Option<String>,
    /// Extracted metadata, in the order the server produced it.
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Result of an upload that reached the server.
#[derive(Debug)]
pub enum UploadOutcome {
    /// Server answered `200 OK`.
    Success(UploadResponse),
    /// Server answered with any other status.
    Rejected {
        /// Status returned by the server.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },
}

/// Local document loaded for upload.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    /// Source path.
    pub path: PathBuf,
    /// Base name sent as the multipart file name.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Load a document from disk, mapping a missing file to [`UploadError::FileNotFound`].
pub async fn read_document(path: &Path) -> Result<DocumentFile, UploadError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(UploadError::FileNotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(UploadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    Ok(DocumentFile {
        path: path.to_path_buf(),
        file_name,
        bytes,
    })
}

/// HTTP client for the upload endpoint.
pub struct UploadClient {
    http: Client,
    endpoint: String,
    timeout: Duration,
}

impl UploadClient {
    /// Construct a client that bounds every request by `timeout`.
    ///
    /// Dialing gets its own shorter bound, so a host that never answers is reported as
    /// unreachable rather than slow.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, UploadError> {
        let http = Client::builder()
            .user_agent("docrag/upload")
            .connect_timeout(CONNECT_TIMEOUT.min(timeout / 2))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Construct a client from the configured endpoint and timeout.
    pub fn from_config(config: &Config) -> Result<Self, UploadError> {
        Self::new(config.upload_url.clone(), config.upload_timeout)
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Read `path` and upload it. A missing file fails before any network activity.
    pub async fn upload(
        &self,
        document_type: DocumentType,
        path: &Path,
    ) -> Result<UploadOutcome, UploadError> {
        let document = read_document(path).await?;
        self.send(document_type, document).await
    }

    /// Upload an already loaded document.
    pub async fn send(
        &self,
        document_type: DocumentType,
        document: DocumentFile,
    ) -> Result<UploadOutcome, UploadError> {
        tracing::info!(
            endpoint = %self.endpoint,
            document_type = document_type.as_str(),
            file = %document.path.display(),
            bytes = document.bytes.len(),
            "Uploading document"
        );

        let part = Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str(PDF_MIME)?;
        let form = Form::new()
            .part("file", part)
            .text("document_type", document_type.as_str());

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|error| self.classify(error))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.map_err(|error| self.classify(error))?;
            tracing::warn!(%status, "Upload rejected");
            return Ok(UploadOutcome::Rejected { status, body });
        }

        let body = response.json().await.map_err(|error| self.classify(error))?;
        tracing::debug!("Upload succeeded");
        Ok(UploadOutcome::Success(body))
    }

    fn classify(&self, error: reqwest::Error) -> UploadError {
        if error.is_connect() {
            UploadError::Connect {
                endpoint: self.endpoint.clone(),
                reason: error.to_string(),
            }
        } else if error.is_timeout() {
            UploadError::Timeout {
                endpoint: self.endpoint.clone(),
                timeout: self.timeout,
            }
        } else if error.is_request() {
            // Connection reset or closed before any response arrived.
            UploadError::Connect {
                endpoint: self.endpoint.clone(),
                reason: error_chain(&error),
            }
        } else if error.is_decode() {
            UploadError::Decode(error.to_string())
        } else {
            UploadError::Request(error)
        }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut reason = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(reason, ": {cause}");
        source = cause.source();
    }
    reason
}

/// Render a server response for the terminal.
pub fn render_outcome(outcome: &UploadOutcome) -> String {
    let mut out = String::new();
    match outcome {
        UploadOutcome::Success(response) => {
            out.push_str("\n✅ Success!\n");
            let _ = writeln!(
                out,
                "Message: {}",
                response.message.as_deref().unwrap_or_default()
            );
            out.push_str("\nExtracted Metadata:\n");
            for (key, value) in response.metadata.iter().flatten() {
                let _ = writeln!(out, "  {key}: {}", preview(&render_value(value)));
            }
        }
        UploadOutcome::Rejected { status, body } => {
            let _ = writeln!(out, "\n❌ Error: {}", status.as_u16());
            let _ = writeln!(out, "{body}");
        }
    }
    out
}

/// Render an upload failure for the terminal.
pub fn render_error(error: &UploadError) -> String {
    match error {
        UploadError::FileNotFound(path) => {
            format!("Error: File not found: {}\n", path.display())
        }
        UploadError::Connect { endpoint, .. } => format!(
            "Error: Could not connect to API. Make sure the server is running on {endpoint}\n"
        ),
        UploadError::Timeout { timeout, .. } => format!(
            "Error: Request timed out after {}s. \
             The document processing is taking longer than expected.\n\
             This might be due to:\n  \
             - Large document size\n  \
             - Slow response from the upstream extraction API\n  \
             - Network connectivity issues\n",
            timeout.as_secs()
        ),
        other => format!("Error: {other}\n"),
    }
}

/// Cut long values to [`PREVIEW_CHARS`] characters, noting the full length.
fn preview(rendered: &str) -> String {
    let length = rendered.chars().count();
    if length <= PREVIEW_CHARS {
        return rendered.to_string();
    }
    let head: String = rendered.chars().take(PREVIEW_CHARS).collect();
    format!("{head}... (truncated, full length: {length} chars)")
}
