//! LendLens Analyzer
//!
//! Sends an uploaded lending document to a multimodal model and turns the
//! reply into a typed result.
//!
//! # Overview
//!
//! Three features share one pipeline. Credit reports and appraisals come back
//! as JSON and are parsed into [`CreditReport`] and [`AppraisalReport`]; title
//! documents come back as a free-text narrative ([`TitleValidation`]).
//!
//! # Architecture
//!
//! ```text
//! File → load_document → DocumentFlow::select → EncodedPayload
//!      → DocumentFlow::submit → Analyzer → AnalysisProvider → normalize → Outcome
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use lendlens_analyzer::{Analyzer, CreditFlow, SubmitOutcome};
//! use lendlens_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = Analyzer::new(MockProvider::new("{}"));
//! let flow = CreditFlow::new(analyzer);
//!
//! flow.select_path("report.pdf", None).await?;
//! match flow.submit().await {
//!     SubmitOutcome::Completed(outcome) => println!("{:?}", outcome.result()),
//!     other => println!("{:?}", other),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod encoder;
mod error;
mod flow;
mod kind;
mod parser;
pub mod prompt;
pub mod schema;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use encoder::load_document;
pub use error::AnalyzerError;
pub use flow::{
    AppraisalFlow, CreditFlow, DocumentFlow, DocumentInfo, FlowError, FlowSnapshot, FlowState,
    Outcome, SubmissionId, SubmitOutcome, TitleFlow,
};
pub use kind::{AnalysisKind, NormalizedResult};
pub use parser::{parse_structured, strip_code_fence};
pub use schema::{AppraisalReport, CreditReport, Severity, Text, TitleValidation};
