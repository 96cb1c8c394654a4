//! Docsync Patch - fuzzy edit application for Markdown documents.
//!
//! An external edit proposer (an LLM) emits batches of edits, each naming a
//! location label, an anchor (`original_text`) and a replacement
//! (`modified_text`). Anchors are approximate: truncated, re-wrapped, elided
//! with ellipses, or scoped to a bare heading instead of the section it
//! stands for. This crate resolves what each edit actually refers to and
//! applies the batch without corrupting the document:
//!
//! - Nested targets collapse to their outermost edit (hierarchical dedup)
//! - Bare heading anchors expand to their full section bodies
//! - Anchors are located exactly first, then by word-overlap similarity at
//!   descending confidence tiers
//! - A collision guard refuses edits that would insert a second copy of
//!   content already present
//! - A final sweep removes paragraphs left literally duplicated
//!
//! Every edit's outcome lands in a [`PatchReport`]; one edit failing never
//! aborts the rest.
//!
//! # Example
//!
//! ```
//! use docsync_patch::{patch, EditRequest};
//!
//! let document = "System X uses LSTM for classification.\n\nUnrelated paragraph.";
//! let edits = vec![EditRequest::new(
//!     "model section",
//!     "System X uses LSTM for classification.",
//!     "System X uses Transformer for classification.",
//! )];
//!
//! let (patched, report) = patch(document, &edits);
//! assert!(patched.starts_with("System X uses Transformer"));
//! assert_eq!(report.applied, vec!["model section".to_string()]);
//! ```

mod applier;
mod batch;
mod dedupe;
mod edit;
mod error;
mod locate;
mod normalize;
mod observer;
mod section;
mod source;
mod sweep;

pub use applier::{
    diff_summary, FailedEdit, PatchOptions, PatchReport, COLLISION_GUARD_MIN_CHARS,
};
pub use batch::{patch_batch, patch_batch_with_observer, PatchJob, PatchedDocument};
pub use dedupe::dedupe_hierarchical;
pub use edit::{parse_edits, EditRequest};
pub use error::{EditFailure, PatchError, PatchResult};
pub use locate::{find_exact, Confidence, FuzzyConfig, MatchResult, RegionLocator};
pub use normalize::normalize;
pub use observer::{NullObserver, PatchObserver, TracingObserver};
pub use section::{expand_section, parse_heading, HeadingInfo};
pub use source::{document_from_bytes, extract_identifier, DocumentSource};
pub use sweep::{sweep, SIGNATURE_CHARS};

/// Apply an edit batch to a document with default options.
///
/// This is the main entry point. Checkpoints go to `tracing`; use
/// [`patch_with_options`] to tune matching or inject your own observer.
///
/// Returns the patched document and the per-edit report. The call itself
/// cannot fail over valid text; inspect the report for per-edit outcomes.
pub fn patch(document: &str, edits: &[EditRequest]) -> (String, PatchReport) {
    applier::apply_edits(document, edits, &PatchOptions::default(), &TracingObserver)
}

/// Apply an edit batch with custom options and observer.
pub fn patch_with_options(
    document: &str,
    edits: &[EditRequest],
    options: &PatchOptions,
    observer: &dyn PatchObserver,
) -> (String, PatchReport) {
    applier::apply_edits(document, edits, options, observer)
}

/// Expand a bare heading anchor into the full text of its section.
///
/// Exposed standalone so a caller can pre-expand a heading before
/// constructing a whole-section replacement. Returns the anchor unchanged
/// when it cannot be located.
pub fn expand_heading(document: &str, heading_anchor: &str) -> String {
    section::expand_section(document, heading_anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_end_to_end_first_occurrence_only() {
        // The same sentence appears twice; exactly one is replaced and the
        // other survives untouched.
        let document = "System X uses LSTM for classification.\n\n\
                        Background material.\n\n\
                        System X uses LSTM for classification.";
        let edits = vec![EditRequest::new(
            "architecture",
            "System X uses LSTM for classification.",
            "System X uses Transformer for classification.",
        )];

        let (patched, report) = patch(document, &edits);
        assert_eq!(
            patched,
            "System X uses Transformer for classification.\n\n\
             Background material.\n\n\
             System X uses LSTM for classification."
        );
        assert_eq!(report.applied, vec!["architecture".to_string()]);
        assert!(report.all_applied());
    }

    #[test]
    fn test_expand_heading_standalone() {
        let document = "# 3 A\nbody\n# 4 B\nmore";
        assert_eq!(expand_heading(document, "# 3 A"), "# 3 A\nbody");
    }

    #[test]
    fn test_full_pipeline_mixed_batch() {
        let document = "\
# 1 Introduction
The system handles incoming edit requests from upstream proposers.

# 2 Architecture
## 2.1 Storage
Documents live in an object store keyed by URL.
## 2.2 Matching
Anchors are matched with decreasing strictness.

# 3 Evaluation
Accuracy was measured on a held-out corpus of documents.";

        let edits = vec![
            // Whole-chapter rewrite via heading expansion.
            EditRequest::new(
                "chapter 2",
                "# 2 Architecture",
                "# 2 Architecture\nRewritten architecture chapter without subsections.",
            )
            .full_chapter(),
            // Subsumed by the chapter-2 edit above.
            EditRequest::new("section 2.1", "## 2.1 Storage", "## 2.1 Storage\nnew storage text")
                .full_chapter(),
            // Plain exact replacement.
            EditRequest::new(
                "evaluation",
                "Accuracy was measured on a held-out corpus of documents.",
                "Accuracy was measured on three held-out corpora of documents.",
            ),
            // No-op after normalization.
            EditRequest::new(
                "intro",
                "The system handles incoming edit requests from upstream proposers.",
                "The system handles incoming edit  requests from upstream proposers. ",
            ),
        ];

        let (patched, report) = patch(document, &edits);

        assert_eq!(report.applied, vec!["chapter 2".to_string(), "evaluation".to_string()]);
        assert_eq!(report.skipped_duplicate, vec!["section 2.1".to_string()]);
        assert_eq!(report.skipped_noop, vec!["intro".to_string()]);
        assert!(report.failed.is_empty());

        assert!(patched.contains("Rewritten architecture chapter without subsections."));
        assert!(!patched.contains("## 2.1 Storage"));
        assert!(!patched.contains("## 2.2 Matching"));
        assert!(patched.contains("three held-out corpora"));
        assert!(patched.contains("# 3 Evaluation"));
    }
}
