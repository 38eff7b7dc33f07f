//! Payload module - the transport form of a document

use crate::document::UploadedDocument;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Error decoding a payload back to bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadError(String);

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid payload encoding: {}", self.0)
    }
}

impl std::error::Error for PayloadError {}

/// Base64-encoded document ready to send to the model
///
/// Derived deterministically from an [`UploadedDocument`]. Decoding always
/// reproduces the original bytes exactly.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    mime_type: String,
    data: String,
}

impl EncodedPayload {
    /// Encode a document
    ///
    /// # Examples
    ///
    /// ```
    /// use lendlens_domain::{EncodedPayload, UploadedDocument};
    ///
    /// let doc = UploadedDocument::new(b"%PDF-1.7".to_vec(), "application/pdf", "r.pdf");
    /// let payload = EncodedPayload::encode(&doc);
    /// assert_eq!(payload.mime_type(), "application/pdf");
    /// assert_eq!(payload.decode().unwrap(), doc.bytes());
    /// ```
    pub fn encode(document: &UploadedDocument) -> Self {
        Self {
            mime_type: document.mime_type().to_string(),
            data: STANDARD.encode(document.bytes()),
        }
    }

    /// MIME type carried over from the document
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 data (standard alphabet, padded)
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Decode back into the original bytes
    pub fn decode(&self) -> Result<Vec<u8>, PayloadError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| PayloadError(e.to_string()))
    }

    /// Render as a `data:` URL
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedPayload")
            .field("mime_type", &self.mime_type)
            .field("encoded_len", &self.data.len())
            .finish()
    }
}

/// Prompt text paired with an encoded document
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    prompt: String,
    payload: EncodedPayload,
}

impl AnalysisRequest {
    /// Create a new request
    pub fn new(prompt: impl Into<String>, payload: EncodedPayload) -> Self {
        Self {
            prompt: prompt.into(),
            payload,
        }
    }

    /// Instruction text for the model
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The document being analyzed
    pub fn payload(&self) -> &EncodedPayload {
        &self.payload
    }
}
