//! Error types for the Analyzer

use lendlens_domain::DocumentClass;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analyzing a document
///
/// Transport and parse failures stay distinct even where their display text
/// is close, so callers can tell "network problem" from "wrong document type".
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The document file could not be read; the submission never started
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is neither PDF nor XML and no MIME type was given
    #[error("Unsupported document type for '{file_name}'. Expected a PDF or XML file.")]
    UnsupportedDocumentType {
        /// Name of the rejected file
        file_name: String,
    },

    /// The remote model call failed (network, HTTP status, or reply shape)
    #[error("{}", transport_message(.class))]
    Transport {
        /// Class of the document being analyzed
        class: DocumentClass,
        /// Provider-level detail, kept for logs
        reason: String,
    },

    /// The reply could not be read as the expected structure
    #[error("{}", parse_message(.class))]
    Parse {
        /// Class of the document being analyzed
        class: DocumentClass,
        /// Parser detail, kept for logs
        reason: String,
    },
}

impl AnalyzerError {
    /// Whether this is a remote call failure
    pub fn is_transport(&self) -> bool {
        matches!(self, AnalyzerError::Transport { .. })
    }

    /// Whether this is a structure/parse failure
    pub fn is_parse(&self) -> bool {
        matches!(self, AnalyzerError::Parse { .. })
    }

    /// Internal detail behind the user-facing message, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            AnalyzerError::Transport { reason, .. } | AnalyzerError::Parse { reason, .. } => {
                Some(reason)
            }
            _ => None,
        }
    }
}

fn transport_message(class: &DocumentClass) -> &'static str {
    match class {
        DocumentClass::Credit => "Failed to validate credit report. Please try again.",
        DocumentClass::Appraisal => "Failed to analyze appraisal document. Please try again.",
        DocumentClass::Title => "Sorry, an error occurred while validating the title document.",
    }
}

fn parse_message(class: &DocumentClass) -> &'static str {
    match class {
        DocumentClass::Credit => {
            "Failed to validate credit report. Please ensure the file is a valid credit report and try again."
        }
        DocumentClass::Appraisal => {
            "Failed to analyze appraisal document. Please ensure the file is a valid appraisal and try again."
        }
        DocumentClass::Title => "Sorry, an error occurred while validating the title document.",
    }
}
