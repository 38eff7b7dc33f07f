//! Uploaded document module - what the user hands to LendLens

use std::fmt;

/// MIME types the document picker accepts
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["application/pdf", "text/xml", "application/xml"];

/// Document formats recognised from a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentMime {
    /// Portable Document Format
    Pdf,

    /// XML export (e.g. MISMO credit or appraisal data)
    Xml,
}

impl DocumentMime {
    /// The MIME type string sent alongside the payload
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentMime::Pdf => "application/pdf",
            DocumentMime::Xml => "application/xml",
        }
    }

    /// Detect the format from a file name's extension (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use lendlens_domain::DocumentMime;
    ///
    /// assert_eq!(DocumentMime::from_file_name("report.PDF"), Some(DocumentMime::Pdf));
    /// assert_eq!(DocumentMime::from_file_name("export.xml"), Some(DocumentMime::Xml));
    /// assert_eq!(DocumentMime::from_file_name("scan.png"), None);
    /// ```
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentMime::Pdf),
            "xml" => Some(DocumentMime::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document selected by the user
///
/// Created on selection and replaced wholesale on re-selection; never mutated.
/// The MIME type is kept exactly as reported by the selection mechanism.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: String,
}

impl UploadedDocument {
    /// Create a new document from its raw parts
    pub fn new(
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Raw document bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type as reported at selection
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Original file name (no directory)
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size of the document in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the MIME type is one of [`ACCEPTED_MIME_TYPES`]
    pub fn is_accepted_type(&self) -> bool {
        ACCEPTED_MIME_TYPES.contains(&self.mime_type.as_str())
    }
}

// Bytes are elided so a stray `{:?}` never dumps a whole PDF into the logs.
impl fmt::Debug for UploadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedDocument")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
