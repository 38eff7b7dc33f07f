//! Document class module - the three kinds of lending documents

/// Class of document submitted for analysis
///
/// Each class selects its own prompt and response handling:
/// - Credit: structured credit report extraction
/// - Appraisal: structured appraisal analysis
/// - Title: free-form title validation narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentClass {
    /// Consumer credit report
    Credit,

    /// Property appraisal
    Appraisal,

    /// Title document or title commitment
    Title,
}

impl DocumentClass {
    /// All classes, in the order the shell lists them
    pub const ALL: [DocumentClass; 3] = [
        DocumentClass::Credit,
        DocumentClass::Appraisal,
        DocumentClass::Title,
    ];

    /// Short identifier used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentClass::Credit => "credit",
            DocumentClass::Appraisal => "appraisal",
            DocumentClass::Title => "title",
        }
    }

    /// Human-readable document name ("credit report", ...)
    pub fn noun(&self) -> &'static str {
        match self {
            DocumentClass::Credit => "credit report",
            DocumentClass::Appraisal => "appraisal",
            DocumentClass::Title => "title document",
        }
    }

    /// Title of the feature that handles this class
    pub fn feature_title(&self) -> &'static str {
        match self {
            DocumentClass::Credit => "Credit Validator",
            DocumentClass::Appraisal => "Appraisal Analysis",
            DocumentClass::Title => "Title Validation",
        }
    }

    /// Whether the model is asked for JSON (true) or free-form text (false)
    pub fn is_structured(&self) -> bool {
        !matches!(self, DocumentClass::Title)
    }

    /// Parse a class from a string (case-insensitive, accepts a few aliases)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credit" | "credit-report" => Some(DocumentClass::Credit),
            "appraisal" => Some(DocumentClass::Appraisal),
            "title" | "title-document" => Some(DocumentClass::Title),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid document class: {}", s))
    }
}
