//! Core Analyzer implementation

use crate::error::AnalyzerError;
use crate::kind::{AnalysisKind, NormalizedResult};
use crate::schema::{AppraisalReport, CreditReport, TitleValidation};
use lendlens_domain::{AnalysisProvider, AnalysisRequest, DocumentClass, EncodedPayload};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The Analyzer sends a document to the model and normalizes the reply
///
/// Holds the one provider instance built at startup; cloning shares it.
pub struct Analyzer<P> {
    provider: Arc<P>,
}

impl<P> Clone for Analyzer<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P> Analyzer<P>
where
    P: AnalysisProvider + Send + Sync + 'static,
    P::Error: Display,
{
    /// Create a new Analyzer around a provider
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Analyze a payload as kind `K`
    ///
    /// Exactly one provider call is made. Provider failures of any sort become
    /// [`AnalyzerError::Transport`]; a reply that does not fit `K` becomes
    /// [`AnalyzerError::Parse`].
    pub async fn analyze<K: AnalysisKind>(
        &self,
        payload: EncodedPayload,
    ) -> Result<K, AnalyzerError> {
        let class = K::CLASS;
        let started = Instant::now();
        let request = AnalysisRequest::new(K::prompt(), payload);

        info!(
            class = %class,
            model = self.provider.model_name(),
            structured = class.is_structured(),
            mime_type = request.payload().mime_type(),
            "Submitting document for analysis"
        );
        debug!("Prompt length: {} chars", request.prompt().len());

        let response = self.provider.analyze(&request).await.map_err(|e| {
            warn!(class = %class, error = %e, "Analysis request failed");
            AnalyzerError::Transport {
                class,
                reason: e.to_string(),
            }
        })?;

        debug!("Model response length: {} chars", response.len());

        let result = K::normalize(response)?;

        info!(
            class = %class,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok(result)
    }

    /// Analyze a payload, choosing the kind from a runtime class
    pub async fn analyze_class(
        &self,
        class: DocumentClass,
        payload: EncodedPayload,
    ) -> Result<NormalizedResult, AnalyzerError> {
        match class {
            DocumentClass::Credit => self
                .analyze::<CreditReport>(payload)
                .await
                .map(AnalysisKind::into_result),
            DocumentClass::Appraisal => self
                .analyze::<AppraisalReport>(payload)
                .await
                .map(AnalysisKind::into_result),
            DocumentClass::Title => self
                .analyze::<TitleValidation>(payload)
                .await
                .map(AnalysisKind::into_result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{APPRAISAL_ANALYSIS_PROMPT, TITLE_VALIDATION_PROMPT};
    use lendlens_domain::UploadedDocument;
    use lendlens_llm::MockProvider;

    fn payload() -> EncodedPayload {
        let doc = UploadedDocument::new(b"%PDF-1.4 test".to_vec(), "application/pdf", "t.pdf");
        EncodedPayload::encode(&doc)
    }

    #[tokio::test]
    async fn test_analyze_sends_class_prompt_and_payload() {
        let llm = MockProvider::new("Title looks clean.");
        let analyzer = Analyzer::new(llm.clone());

        let result = analyzer.analyze::<TitleValidation>(payload()).await.unwrap();
        assert_eq!(result.text(), "Title looks clean.");

        let sent = llm.last_request().unwrap();
        assert_eq!(sent.prompt(), TITLE_VALIDATION_PROMPT);
        assert_eq!(sent.payload(), &payload());
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_is_transport() {
        let mut llm = MockProvider::default();
        llm.add_error(APPRAISAL_ANALYSIS_PROMPT);
        let analyzer = Analyzer::new(llm);

        let err = analyzer
            .analyze::<AppraisalReport>(payload())
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.reason(), Some("LLM error: Mock error"));
    }

    #[tokio::test]
    async fn test_bad_structure_is_parse() {
        let analyzer = Analyzer::new(MockProvider::new("I could not read this document."));

        let err = analyzer.analyze::<CreditReport>(payload()).await.unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn test_analyze_class_dispatch() {
        let analyzer = Analyzer::new(MockProvider::new("narrative"));

        let result = analyzer
            .analyze_class(DocumentClass::Title, payload())
            .await
            .unwrap();
        assert_eq!(result, NormalizedResult::Title(TitleValidation::new("narrative")));
    }
}
