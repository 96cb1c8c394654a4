//! Instrumentation seam for patch application.
//!
//! The pipeline reports what it is doing through an injected observer rather
//! than logging directly, so embedders decide where diagnostics go. The
//! default [`TracingObserver`] forwards every checkpoint to `tracing`;
//! [`NullObserver`] drops them.

use crate::locate::Confidence;
use tracing::{debug, info, warn};

/// Checkpoints raised while applying an edit batch.
///
/// All methods default to no-ops; implement only what you care about.
pub trait PatchObserver: Send + Sync {
    /// The anchor was found verbatim at `offset`.
    fn exact_match(&self, location: &str, offset: usize) {
        let _ = (location, offset);
    }

    /// Exact matching failed; fuzzy matching is being attempted at
    /// `threshold`. Raised once per tier, in escalation order.
    fn fuzzy_escalated(&self, location: &str, threshold: f64) {
        let _ = (location, threshold);
    }

    /// A fuzzy region was accepted for the edit.
    fn fuzzy_match(&self, location: &str, confidence: Confidence, offset: usize) {
        let _ = (location, confidence, offset);
    }

    /// The collision guard refused the edit.
    fn collision_guard(&self, location: &str) {
        let _ = location;
    }

    /// A heading anchor could not be expanded; the raw anchor is used as-is.
    fn expansion_failed(&self, location: &str) {
        let _ = location;
    }
}

/// Observer that discards all checkpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PatchObserver for NullObserver {}

/// Observer that forwards checkpoints to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PatchObserver for TracingObserver {
    fn exact_match(&self, location: &str, offset: usize) {
        debug!(location, offset, "anchor matched exactly");
    }

    fn fuzzy_escalated(&self, location: &str, threshold: f64) {
        debug!(location, threshold, "escalating to fuzzy matching");
    }

    fn fuzzy_match(&self, location: &str, confidence: Confidence, offset: usize) {
        match confidence {
            Confidence::Exact | Confidence::FuzzyHigh => {
                debug!(location, offset, "fuzzy region accepted")
            }
            Confidence::FuzzyMedium => {
                info!(location, offset, "fuzzy region accepted with low confidence")
            }
            Confidence::FuzzyLow => warn!(
                location,
                offset, "fuzzy region accepted near the similarity floor; verify the result"
            ),
        }
    }

    fn collision_guard(&self, location: &str) {
        warn!(
            location,
            "replacement already present elsewhere in document; edit skipped"
        );
    }

    fn expansion_failed(&self, location: &str) {
        warn!(location, "heading could not be expanded; using raw anchor");
    }
}
