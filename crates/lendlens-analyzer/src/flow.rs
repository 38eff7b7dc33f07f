//! Document-analysis flow: per-feature submission state machine
//!
//! One generic [`DocumentFlow`] serves all three features; the kind parameter
//! supplies the prompt, response mode, and result type.
//!
//! ```text
//! Idle ──select──▶ FileSelected ──submit──▶ InFlight ──▶ Succeeded | Failed
//!   ▲                                                          │
//!   └──────────────────────────── clear ◀──────────────────────┘ (from any state)
//! ```

use crate::analyzer::Analyzer;
use crate::encoder::load_document;
use crate::error::AnalyzerError;
use crate::kind::AnalysisKind;
use crate::schema::{AppraisalReport, CreditReport, TitleValidation};
use lendlens_domain::{AnalysisProvider, DocumentClass, EncodedPayload, UploadedDocument};
use std::fmt::{self, Display};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Credit Validator feature
pub type CreditFlow<P> = DocumentFlow<P, CreditReport>;

/// Appraisal Analysis feature
pub type AppraisalFlow<P> = DocumentFlow<P, AppraisalReport>;

/// Title Validation feature
pub type TitleFlow<P> = DocumentFlow<P, TitleValidation>;

/// Where a flow sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Nothing selected
    Idle,
    /// A document is selected and ready to submit
    FileSelected,
    /// A submission is waiting on the model
    InFlight,
    /// The last submission produced a result
    Succeeded,
    /// The last submission failed
    Failed,
}

impl FlowState {
    /// Lowercase label for display
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::FileSelected => "file selected",
            FlowState::InFlight => "in flight",
            FlowState::Succeeded => "succeeded",
            FlowState::Failed => "failed",
        }
    }
}

impl Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of one submission, used to match completions to requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Result of a finished submission: exactly one of result or error
#[derive(Debug, Clone)]
pub enum Outcome<K> {
    /// Analysis and normalization succeeded
    Succeeded(K),
    /// The remote call or normalization failed
    Failed(Arc<AnalyzerError>),
}

impl<K> Outcome<K> {
    /// The result, if the submission succeeded
    pub fn result(&self) -> Option<&K> {
        match self {
            Outcome::Succeeded(result) => Some(result),
            Outcome::Failed(_) => None,
        }
    }

    /// The error, if the submission failed
    pub fn error(&self) -> Option<&AnalyzerError> {
        match self {
            Outcome::Succeeded(_) => None,
            Outcome::Failed(err) => Some(err.as_ref()),
        }
    }

    /// Map the success value
    pub fn map<T>(self, f: impl FnOnce(K) -> T) -> Outcome<T> {
        match self {
            Outcome::Succeeded(result) => Outcome::Succeeded(f(result)),
            Outcome::Failed(err) => Outcome::Failed(err),
        }
    }
}

/// What happened when `submit` was called
#[derive(Debug, Clone)]
pub enum SubmitOutcome<K> {
    /// No document selected; nothing happened
    NoDocument,
    /// A submission is already in flight; nothing happened
    Rejected,
    /// The submission ran and its outcome is now the flow's outcome
    Completed(Outcome<K>),
    /// The flow was cleared while this submission ran; its outcome was dropped
    Superseded,
}

impl<K> SubmitOutcome<K> {
    /// Map the success value of a completed submission
    pub fn map<T>(self, f: impl FnOnce(K) -> T) -> SubmitOutcome<T> {
        match self {
            SubmitOutcome::NoDocument => SubmitOutcome::NoDocument,
            SubmitOutcome::Rejected => SubmitOutcome::Rejected,
            SubmitOutcome::Completed(outcome) => SubmitOutcome::Completed(outcome.map(f)),
            SubmitOutcome::Superseded => SubmitOutcome::Superseded,
        }
    }
}

/// Errors from flow operations other than submit
#[derive(Error, Debug)]
pub enum FlowError {
    /// Selection is not allowed while a submission is in flight
    #[error("A {0} is already being analyzed. Wait for it to finish.")]
    Busy(&'static str),

    /// The document could not be loaded
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// Selected document summary, without the bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Original file name
    pub file_name: String,
    /// MIME type as selected
    pub mime_type: String,
    /// Size in bytes
    pub size: usize,
}

/// Point-in-time copy of a flow's state for rendering
#[derive(Debug, Clone)]
pub struct FlowSnapshot<K> {
    /// Which feature this is
    pub class: DocumentClass,
    /// Lifecycle position
    pub state: FlowState,
    /// Selected document, if any
    pub document: Option<DocumentInfo>,
    /// Last outcome, if any
    pub outcome: Option<Outcome<K>>,
    /// An outbound call is still running, possibly one orphaned by `clear`
    pub busy: bool,
}

struct SubmissionState<K> {
    document: Option<UploadedDocument>,
    payload: Option<EncodedPayload>,
    /// Submission whose outcome this flow will keep
    in_flight: Option<SubmissionId>,
    /// Outbound call still running; survives `clear`
    pending: Option<SubmissionId>,
    outcome: Option<Outcome<K>>,
}

impl<K> SubmissionState<K> {
    fn empty() -> Self {
        Self {
            document: None,
            payload: None,
            in_flight: None,
            pending: None,
            outcome: None,
        }
    }

    fn reset(&mut self) {
        self.document = None;
        self.payload = None;
        self.in_flight = None;
        self.outcome = None;
    }

    fn state(&self) -> FlowState {
        if self.in_flight.is_some() {
            return FlowState::InFlight;
        }
        match (&self.outcome, &self.document) {
            (Some(Outcome::Succeeded(_)), _) => FlowState::Succeeded,
            (Some(Outcome::Failed(_)), _) => FlowState::Failed,
            (None, Some(_)) => FlowState::FileSelected,
            (None, None) => FlowState::Idle,
        }
    }
}

/// One feature's submission controller
///
/// All methods take `&self`; share it behind an `Arc` to submit from a task.
/// State sits behind a mutex that is never held across an `.await`.
pub struct DocumentFlow<P, K> {
    analyzer: Analyzer<P>,
    state: Mutex<SubmissionState<K>>,
}

impl<P, K> DocumentFlow<P, K>
where
    P: AnalysisProvider + Send + Sync + 'static,
    P::Error: Display,
    K: AnalysisKind,
{
    /// Create an idle flow
    pub fn new(analyzer: Analyzer<P>) -> Self {
        Self {
            analyzer,
            state: Mutex::new(SubmissionState::empty()),
        }
    }

    /// Document class handled by this flow
    pub fn class(&self) -> DocumentClass {
        K::CLASS
    }

    /// Current lifecycle state
    pub fn state(&self) -> FlowState {
        self.lock().state()
    }

    /// Last outcome, if any
    pub fn outcome(&self) -> Option<Outcome<K>> {
        self.lock().outcome.clone()
    }

    /// Summary of the selected document, if any
    pub fn document(&self) -> Option<DocumentInfo> {
        self.lock().document.as_ref().map(|doc| DocumentInfo {
            file_name: doc.file_name().to_string(),
            mime_type: doc.mime_type().to_string(),
            size: doc.len(),
        })
    }

    /// Copy of everything a renderer needs
    pub fn snapshot(&self) -> FlowSnapshot<K> {
        let state = self.lock();
        FlowSnapshot {
            class: K::CLASS,
            state: state.state(),
            document: state.document.as_ref().map(|doc| DocumentInfo {
                file_name: doc.file_name().to_string(),
                mime_type: doc.mime_type().to_string(),
                size: doc.len(),
            }),
            outcome: state.outcome.clone(),
            busy: state.pending.is_some(),
        }
    }

    /// Select a document, replacing any previous one and clearing the outcome
    pub fn select(&self, document: UploadedDocument) -> Result<(), FlowError> {
        let mut state = self.lock();
        if state.in_flight.is_some() {
            return Err(FlowError::Busy(K::CLASS.noun()));
        }

        debug!(class = %K::CLASS, file_name = document.file_name(), "Document selected");
        state.payload = Some(EncodedPayload::encode(&document));
        state.document = Some(document);
        state.outcome = None;
        Ok(())
    }

    /// Load a document from disk and select it
    ///
    /// A load failure leaves the flow exactly as it was.
    pub async fn select_path(
        &self,
        path: impl AsRef<Path>,
        mime_type: Option<&str>,
    ) -> Result<(), FlowError> {
        if self.lock().in_flight.is_some() {
            return Err(FlowError::Busy(K::CLASS.noun()));
        }

        let document = load_document(path, mime_type).await?;
        self.select(document)
    }

    /// Submit the selected document for analysis
    ///
    /// With no document this is a no-op. While another submission from this
    /// flow is in flight the call is rejected without contacting the model.
    pub async fn submit(&self) -> SubmitOutcome<K> {
        let (id, payload) = {
            let mut state = self.lock();
            let Some(payload) = state.payload.clone() else {
                debug!(class = %K::CLASS, "Submit ignored: no document selected");
                return SubmitOutcome::NoDocument;
            };
            if state.pending.is_some() {
                debug!(class = %K::CLASS, "Submit rejected: already in flight");
                return SubmitOutcome::Rejected;
            }

            let id = SubmissionId::new();
            state.in_flight = Some(id);
            state.pending = Some(id);
            state.outcome = None;
            (id, payload)
        };

        info!(class = %K::CLASS, submission = %id, "Submission started");

        let outcome = match self.analyzer.analyze::<K>(payload).await {
            Ok(result) => Outcome::Succeeded(result),
            Err(err) => Outcome::Failed(Arc::new(err)),
        };

        let mut state = self.lock();
        state.pending = None;
        if state.in_flight != Some(id) {
            warn!(class = %K::CLASS, submission = %id, "Flow cleared during submission; outcome dropped");
            return SubmitOutcome::Superseded;
        }

        state.in_flight = None;
        state.outcome = Some(outcome.clone());
        info!(class = %K::CLASS, submission = %id, state = %state.state(), "Submission finished");
        SubmitOutcome::Completed(outcome)
    }

    /// Discard the document, payload, and outcome; back to idle
    ///
    /// A submission still running finishes, but its outcome is dropped. Until
    /// it does, `submit` keeps rejecting.
    pub fn clear(&self) {
        let mut state = self.lock();
        if let Some(id) = state.pending {
            debug!(class = %K::CLASS, submission = %id, "Clearing flow with a submission in flight");
        }
        state.reset();
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState<K>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
