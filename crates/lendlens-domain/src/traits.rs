//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::payload::AnalysisRequest;
use std::future::Future;

/// Trait for the remote generative model
///
/// Implemented by the infrastructure layer (lendlens-llm). The model is a
/// black box: a document plus instructions go in, generated text comes out.
///
/// Implementations issue exactly one outbound call per invocation. They do
/// not retry, cache, or de-duplicate identical documents.
pub trait AnalysisProvider {
    /// Error type for provider operations
    type Error;

    /// Send the document and prompt to the model and return its raw text
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Identifier of the generation model in use
    fn model_name(&self) -> &str;
}
