//! LendLens LLM Provider Layer
//!
//! Implementations of the `AnalysisProvider` trait from `lendlens-domain`.
//!
//! # Architecture
//!
//! Each provider is constructed once, from explicit configuration, and handed
//! to the analyzer. There is no process-wide client and no ambient credential.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Generative Language API (`generateContent`)
//!
//! # Examples
//!
//! ```
//! use lendlens_domain::{AnalysisProvider, AnalysisRequest, EncodedPayload, UploadedDocument};
//! use lendlens_llm::MockProvider;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let doc = UploadedDocument::new(b"%PDF".to_vec(), "application/pdf", "r.pdf");
//! let request = AnalysisRequest::new("Summarize", EncodedPayload::encode(&doc));
//! let result = provider.analyze(&request).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod gemini;

use lendlens_domain::{AnalysisProvider, AnalysisRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::Semaphore;

pub use gemini::{GeminiConfig, GeminiProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Canned reply for a given prompt
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Every request it receives is recorded so tests can assert on what was sent.
///
/// # Examples
///
/// ```
/// use lendlens_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("credit prompt", r#"{"ok": true}"#);
/// provider.add_error("title prompt");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    requests: Arc<Mutex<Vec<AnalysisRequest>>>,
    gate: Option<Arc<Semaphore>>,
}

/// Handle that releases calls held by a gated [`MockProvider`]
#[derive(Debug, Clone)]
pub struct MockGate {
    semaphore: Arc<Semaphore>,
}

impl MockGate {
    /// Let `n` pending (or future) calls complete
    pub fn release(&self, n: usize) {
        self.semaphore.add_permits(n);
    }
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Create a MockProvider whose calls block until released through the gate
    ///
    /// The request is recorded before the call blocks, so `call_count()`
    /// reflects calls that are still in flight.
    pub fn gated(response: impl Into<String>) -> (Self, MockGate) {
        let semaphore = Arc::new(Semaphore::new(0));
        let mut provider = Self::new(response);
        provider.gate = Some(Arc::clone(&semaphore));
        (provider, MockGate { semaphore })
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.lock_responses()
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.lock_responses().insert(prompt.into(), MockReply::Error);
    }

    /// Get the number of times analyze was called
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Reset the call count and recorded requests
    pub fn reset_call_count(&self) {
        self.lock_requests().clear();
    }

    /// The most recent request received, if any
    pub fn last_request(&self) -> Option<AnalysisRequest> {
        self.lock_requests().last().cloned()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, HashMap<String, MockReply>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<AnalysisRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reply_for(&self, prompt: &str) -> Result<String, LlmError> {
        match self.lock_responses().get(prompt) {
            Some(MockReply::Text(text)) => Ok(text.clone()),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl AnalysisProvider for MockProvider {
    type Error = LlmError;

    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, Self::Error> {
        self.lock_requests().push(request.clone());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| LlmError::Other(format!("Mock gate closed: {}", e)))?;
            permit.forget();
        }

        self.reply_for(request.prompt())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
