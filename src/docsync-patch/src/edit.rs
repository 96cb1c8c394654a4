//! The edit request schema produced by the upstream edit proposer.

use serde::{Deserialize, Serialize};

/// A single proposed edit.
///
/// Produced by an external process (an LLM) and immutable once handed to the
/// pipeline. The anchor in `original_text` is a claim, not a guarantee; the
/// applier decides what it actually refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    /// Human-readable label for where the edit claims to land (chapter name,
    /// position description). Used verbatim in reports.
    pub location: String,
    /// The text the edit believes it is replacing. May be a bare heading line
    /// when `is_full_chapter` is set.
    pub original_text: String,
    /// The replacement text.
    pub modified_text: String,
    /// Why the edit was proposed. Informational only.
    #[serde(default)]
    pub reason: String,
    /// Upstream classification (terminology change, data update, ...).
    /// Informational only.
    #[serde(default)]
    pub modification_type: String,
    /// Signals that `original_text` may be a heading line standing in for its
    /// whole section and should be expanded before location.
    #[serde(default)]
    pub is_full_chapter: bool,
}

impl EditRequest {
    /// Create an edit request with the given anchor and replacement.
    pub fn new(
        location: impl Into<String>,
        original_text: impl Into<String>,
        modified_text: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            original_text: original_text.into(),
            modified_text: modified_text.into(),
            reason: String::new(),
            modification_type: String::new(),
            is_full_chapter: false,
        }
    }

    /// Mark the anchor as a whole-chapter target.
    pub fn full_chapter(mut self) -> Self {
        self.is_full_chapter = true;
        self
    }

    /// Attach the proposer's reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// First line of the anchor, when it is a Markdown heading line.
    pub fn heading_line(&self) -> Option<&str> {
        let first = self.original_text.trim_start().lines().next()?;
        first.starts_with('#').then_some(first)
    }

    /// True when the anchor is a bare heading line eligible for section
    /// expansion.
    pub fn wants_expansion(&self) -> bool {
        self.is_full_chapter
            && self.heading_line().is_some()
            && self.original_text.trim().lines().count() == 1
    }
}

/// The upstream proposer emits `{"modifications": [...]}`; older revisions
/// emit a bare array. Both decode to the same edit list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EditEnvelope {
    Wrapped { modifications: Vec<EditRequest> },
    Bare(Vec<EditRequest>),
}

/// Decode an edit list from proposer JSON output.
pub fn parse_edits(json: &str) -> Result<Vec<EditRequest>, serde_json::Error> {
    let envelope: EditEnvelope = serde_json::from_str(json)?;
    Ok(match envelope {
        EditEnvelope::Wrapped { modifications } => modifications,
        EditEnvelope::Bare(edits) => edits,
    })
}
