//! Read a document from disk into an [`UploadedDocument`]

use crate::error::AnalyzerError;
use lendlens_domain::{DocumentMime, UploadedDocument};
use std::path::Path;
use tracing::{debug, warn};

/// Load a document, resolving its MIME type
///
/// An explicit `mime_type` is kept verbatim. Otherwise the type comes from the
/// file extension (`.pdf` or `.xml`); any other extension is rejected before
/// the file is read. A read failure yields [`AnalyzerError::Read`] and no
/// document at all.
pub async fn load_document(
    path: impl AsRef<Path>,
    mime_type: Option<&str>,
) -> Result<UploadedDocument, AnalyzerError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mime_type = match mime_type {
        Some(explicit) => explicit.to_string(),
        None => DocumentMime::from_file_name(&file_name)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| AnalyzerError::UnsupportedDocumentType {
                file_name: file_name.clone(),
            })?,
    };

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(file_name = %file_name, mime_type = %mime_type, size = bytes.len(), "Loaded document");

    let document = UploadedDocument::new(bytes, mime_type, file_name);
    if !document.is_accepted_type() {
        warn!(
            file_name = document.file_name(),
            mime_type = document.mime_type(),
            "Sending document with a MIME type outside PDF/XML"
        );
    }
    Ok(document)
}
