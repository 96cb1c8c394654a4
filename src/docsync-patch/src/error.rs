//! Error types for the edit pipeline.
//!
//! Per-edit problems never abort a batch; they accumulate in the report as
//! [`EditFailure`] reasons. [`PatchError`] is reserved for document-level
//! conditions at the collaborator boundary: a fetch that failed, or fetched
//! bytes that are not text.

use thiserror::Error;

/// Result type for document-level operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Document-level errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The fetched bytes are not valid UTF-8 text.
    #[error("document {identifier} is not valid text: {message}")]
    InvalidDocument { identifier: String, message: String },

    /// The document store failed to produce the document. The pipeline never
    /// retries or interprets transport failures.
    #[error("failed to fetch document {identifier}: {message}")]
    Fetch { identifier: String, message: String },
}

impl PatchError {
    /// Create a fetch error.
    pub fn fetch(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

/// Why a single edit was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditFailure {
    /// Neither exact nor fuzzy matching, down to the lowest threshold,
    /// located the anchor.
    #[error("anchor not located by exact or fuzzy matching")]
    AnchorNotFound,

    /// Applying the edit would insert content that already exists verbatim
    /// elsewhere in the document.
    #[error("replacement already exists elsewhere in the document")]
    CollisionGuard,

    /// The edit carries no anchor text at all.
    #[error("edit has an empty anchor")]
    EmptyAnchor,
}
