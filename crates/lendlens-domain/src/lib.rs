//! LendLens Domain Layer
//!
//! This crate contains the core domain model for LendLens: the documents a user
//! submits, the encoded payload that travels to the remote model, and the trait
//! boundary every model provider implements.
//!
//! ## Key Concepts
//!
//! - **DocumentClass**: Credit report, appraisal, or title document
//! - **UploadedDocument**: Raw bytes plus the MIME type reported at selection
//! - **EncodedPayload**: Base64 transport form of a document, lossless
//! - **AnalysisRequest**: Prompt text paired with a payload, immutable
//! - **AnalysisProvider**: The opaque remote model (document + instructions → text)
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - One external dependency (`base64`) for the payload primitive
//! - No I/O; file reading and networking live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod class;
pub mod document;
pub mod payload;
pub mod traits;

// Re-exports for convenience
pub use class::DocumentClass;
pub use document::{DocumentMime, UploadedDocument, ACCEPTED_MIME_TYPES};
pub use payload::{AnalysisRequest, EncodedPayload, PayloadError};
pub use traits::AnalysisProvider;
