//! Per-class analysis behaviour: prompt, response mode, result type

use crate::error::AnalyzerError;
use crate::parser::parse_structured;
use crate::prompt::prompt_for;
use crate::schema::{AppraisalReport, CreditReport, TitleValidation};
use lendlens_domain::DocumentClass;

/// A result type the analyzer can produce from a model response
///
/// Implemented once per document class. Structured kinds parse the response;
/// the free-text kind passes it through untouched.
pub trait AnalysisKind: Clone + Send + Sync + Sized + 'static {
    /// Class of document this kind analyzes
    const CLASS: DocumentClass;

    /// Prompt sent with the document
    fn prompt() -> &'static str {
        prompt_for(Self::CLASS)
    }

    /// Turn the model's raw text into this result
    fn normalize(response: String) -> Result<Self, AnalyzerError>;

    /// Erase the concrete type for rendering
    fn into_result(self) -> NormalizedResult;
}

impl AnalysisKind for CreditReport {
    const CLASS: DocumentClass = DocumentClass::Credit;

    fn normalize(response: String) -> Result<Self, AnalyzerError> {
        parse_structured(&response, Self::CLASS)
    }

    fn into_result(self) -> NormalizedResult {
        NormalizedResult::Credit(self)
    }
}

impl AnalysisKind for AppraisalReport {
    const CLASS: DocumentClass = DocumentClass::Appraisal;

    fn normalize(response: String) -> Result<Self, AnalyzerError> {
        parse_structured(&response, Self::CLASS)
    }

    fn into_result(self) -> NormalizedResult {
        NormalizedResult::Appraisal(self)
    }
}

impl AnalysisKind for TitleValidation {
    const CLASS: DocumentClass = DocumentClass::Title;

    fn normalize(response: String) -> Result<Self, AnalyzerError> {
        Ok(TitleValidation::new(response))
    }

    fn into_result(self) -> NormalizedResult {
        NormalizedResult::Title(self)
    }
}

/// A successful analysis of any class
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResult {
    /// Structured credit report
    Credit(CreditReport),
    /// Structured appraisal
    Appraisal(AppraisalReport),
    /// Title narrative
    Title(TitleValidation),
}

impl NormalizedResult {
    /// Class of the analyzed document
    pub fn class(&self) -> DocumentClass {
        match self {
            NormalizedResult::Credit(_) => DocumentClass::Credit,
            NormalizedResult::Appraisal(_) => DocumentClass::Appraisal,
            NormalizedResult::Title(_) => DocumentClass::Title,
        }
    }
}
