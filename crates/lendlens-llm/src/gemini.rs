//! Gemini Provider Implementation
//!
//! Provides integration with Google's Generative Language API.
//!
//! # Features
//!
//! - Async HTTP communication with the `generateContent` endpoint
//! - Inline document upload (base64 data plus MIME type)
//! - Configurable endpoint, model, and optional request timeout
//! - Single attempt per call; failures surface immediately
//!
//! # Examples
//!
//! ```no_run
//! use lendlens_llm::{GeminiConfig, GeminiProvider};
//!
//! let config = GeminiConfig::new("my-api-key");
//! let provider = GeminiProvider::new(config).unwrap();
//! ```

use crate::LlmError;
use lendlens_domain::{AnalysisProvider, AnalysisRequest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for [`GeminiProvider`]
#[derive(Clone)]
pub struct GeminiConfig {
    /// API base URL, without trailing slash
    pub endpoint: String,

    /// Generation model identifier
    pub model: String,

    /// API key sent with every request
    pub api_key: String,

    /// Request timeout; `None` leaves it to the transport
    pub request_timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Configuration with the default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            request_timeout: None,
        }
    }

    /// Override the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Gemini API provider for document analysis
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for the generateContent API
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

/// Response from the generateContent API
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn build_body(request: &AnalysisRequest) -> GenerateContentRequest<'_> {
    let payload = request.payload();
    GenerateContentRequest {
        contents: [Content {
            parts: [
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: payload.mime_type(),
                        data: payload.data(),
                    },
                },
                Part::Text {
                    text: request.prompt(),
                },
            ],
        }],
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Authentication`] when the API key is empty, or
    /// [`LlmError::Other`] if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Authentication("API key is empty".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model,
            api_key: config.api_key,
            client,
        })
    }

    /// Full URL of the generateContent call for the configured model
    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Send the document and prompt to Gemini
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The network request fails
    /// - The API key is rejected (401/403)
    /// - The model is unknown (404)
    /// - The API is rate limiting (429)
    /// - Any other non-success status is returned
    /// - The reply carries no generated text
    pub async fn generate(&self, request: &AnalysisRequest) -> Result<String, LlmError> {
        let url = self.url();
        debug!(
            model = %self.model,
            mime_type = request.payload().mime_type(),
            encoded_len = request.payload().data().len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, "Gemini returned an error status");
            return Err(match status {
                reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Authentication(format!("HTTP {}", status))
                }
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        body.into_text()
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no text".to_string()))
    }
}

impl AnalysisProvider for GeminiProvider {
    type Error = LlmError;

    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, Self::Error> {
        self.generate(request).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
