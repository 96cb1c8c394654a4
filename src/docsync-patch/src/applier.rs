//! Sequential application of an edit batch to a single document buffer.
//!
//! Edits are applied in list order against one evolving buffer: an edit's
//! replacement text is visible to the substring search of every subsequent
//! edit. Location and substitution for one document are therefore strictly
//! sequential; parallelism only exists across independent documents (see the
//! batch module).

use crate::dedupe::dedupe_hierarchical;
use crate::edit::EditRequest;
use crate::error::EditFailure;
use crate::locate::{find_exact, Confidence, FuzzyConfig, MatchResult, RegionLocator};
use crate::normalize::normalize;
use crate::observer::PatchObserver;
use crate::section::expand_section;
use crate::sweep::sweep;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::collections::HashSet;

/// Minimum normalized replacement length (in characters) for the collision
/// guard to engage. Shorter replacements legitimately occur all over a
/// document and must not trip it.
pub const COLLISION_GUARD_MIN_CHARS: usize = 20;

/// Options for edit application.
#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// Fuzzy matching configuration.
    pub fuzzy: FuzzyConfig,
    /// Refuse edits whose replacement already exists verbatim elsewhere in
    /// the document.
    pub collision_guard: bool,
    /// Run the duplicate-paragraph sweep after all edits have been applied.
    pub sweep: bool,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            fuzzy: FuzzyConfig::default(),
            collision_guard: true,
            sweep: true,
        }
    }
}

/// An edit that could not be applied, with the reason why.
#[derive(Debug, Clone, Serialize)]
pub struct FailedEdit {
    /// The edit's location label.
    pub location: String,
    /// Human-readable failure reason.
    pub reason: String,
}

impl FailedEdit {
    fn new(location: &str, failure: EditFailure) -> Self {
        Self {
            location: location.to_string(),
            reason: failure.to_string(),
        }
    }
}

/// Per-batch outcome report, built incrementally during application and
/// never mutated afterward.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchReport {
    /// Locations of edits that were applied.
    pub applied: Vec<String>,
    /// Locations skipped because another edit already covers the same anchor
    /// or a containing section.
    pub skipped_duplicate: Vec<String>,
    /// Locations skipped because replacement and anchor are identical after
    /// normalization.
    pub skipped_noop: Vec<String>,
    /// Edits that could not be applied.
    pub failed: Vec<FailedEdit>,
    /// Paragraphs removed by the post-application sweep.
    pub swept_paragraphs: usize,
}

impl PatchReport {
    /// Check if every located edit was applied (skips are not failures).
    pub fn all_applied(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of edits accounted for.
    pub fn total(&self) -> usize {
        self.applied.len() + self.skipped_duplicate.len() + self.skipped_noop.len() + self.failed.len()
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        let mut summary = format!("applied {}/{} edit(s)", self.applied.len(), self.total());
        if !self.skipped_duplicate.is_empty() || !self.skipped_noop.is_empty() {
            summary.push_str(&format!(
                " ({} duplicate(s), {} no-op(s) skipped)",
                self.skipped_duplicate.len(),
                self.skipped_noop.len()
            ));
        }
        if !self.failed.is_empty() {
            summary.push_str(&format!(", {} failed", self.failed.len()));
        }
        if self.swept_paragraphs > 0 {
            summary.push_str(&format!(", {} duplicate paragraph(s) swept", self.swept_paragraphs));
        }
        summary
    }
}

/// Apply an edit batch to a document.
///
/// Pipeline: hierarchical dedup first, then per edit: identical-anchor dedup,
/// heading expansion, no-op check, location (exact, then fuzzy at descending
/// thresholds), collision guard, first-occurrence substitution. One
/// duplicate-paragraph sweep runs at the end. One edit's failure never aborts
/// the rest.
pub(crate) fn apply_edits(
    document: &str,
    edits: &[EditRequest],
    options: &PatchOptions,
    observer: &dyn PatchObserver,
) -> (String, PatchReport) {
    let mut report = PatchReport::default();

    let (edits, subsumed) = dedupe_hierarchical(edits);
    for edit in &subsumed {
        report.skipped_duplicate.push(edit.location.clone());
    }

    let locator = RegionLocator::new(options.fuzzy.clone());
    let mut buffer = document.to_string();
    let mut seen_anchors: HashSet<String> = HashSet::new();

    for edit in &edits {
        let normalized_anchor = normalize(&edit.original_text);
        if normalized_anchor.is_empty() {
            report
                .failed
                .push(FailedEdit::new(&edit.location, EditFailure::EmptyAnchor));
            continue;
        }

        // Identical anchors proposed twice must not be applied twice.
        if !seen_anchors.insert(normalized_anchor) {
            report.skipped_duplicate.push(edit.location.clone());
            continue;
        }

        // A bare heading anchor stands in for its whole section. Expansion
        // reads the current buffer so earlier edits' effects are visible.
        let anchor = if edit.wants_expansion() {
            let heading = edit.original_text.trim();
            if buffer.contains(heading) {
                expand_section(&buffer, heading)
            } else {
                observer.expansion_failed(&edit.location);
                edit.original_text.clone()
            }
        } else {
            edit.original_text.clone()
        };

        if normalize(&anchor) == normalize(&edit.modified_text) {
            report.skipped_noop.push(edit.location.clone());
            continue;
        }

        let Some(region) = locate(&anchor, &buffer, &locator, options, edit, observer) else {
            report
                .failed
                .push(FailedEdit::new(&edit.location, EditFailure::AnchorNotFound));
            continue;
        };

        if options.collision_guard
            && would_collide(&buffer, &region.matched_text, &edit.modified_text)
        {
            observer.collision_guard(&edit.location);
            report
                .failed
                .push(FailedEdit::new(&edit.location, EditFailure::CollisionGuard));
            continue;
        }

        buffer = buffer.replacen(&region.matched_text, &edit.modified_text, 1);
        report.applied.push(edit.location.clone());
    }

    if options.sweep {
        let (swept, dropped) = sweep(&buffer);
        buffer = swept;
        report.swept_paragraphs = dropped;
    }

    (buffer, report)
}

/// Resolve the region an edit refers to: exact first, then fuzzy at each
/// configured threshold in escalation order.
fn locate(
    anchor: &str,
    buffer: &str,
    locator: &RegionLocator,
    options: &PatchOptions,
    edit: &EditRequest,
    observer: &dyn PatchObserver,
) -> Option<MatchResult> {
    if let Some(offset) = find_exact(anchor, buffer) {
        observer.exact_match(&edit.location, offset);
        return Some(MatchResult {
            matched_text: anchor.to_string(),
            start_offset: offset,
            confidence: Confidence::Exact,
        });
    }

    for threshold in options.fuzzy.tiers() {
        observer.fuzzy_escalated(&edit.location, threshold);
        if let Some(result) = locator.find_fuzzy(anchor, buffer, threshold) {
            observer.fuzzy_match(&edit.location, result.confidence, result.start_offset);
            return Some(result);
        }
    }

    None
}

/// Would substituting `replacement` for `region` insert a second copy of
/// content that already exists in the document?
fn would_collide(document: &str, region: &str, replacement: &str) -> bool {
    if replacement.is_empty() {
        return false;
    }
    if normalize(replacement).chars().count() < COLLISION_GUARD_MIN_CHARS {
        return false;
    }
    // A replacement contained in the region it replaces cannot duplicate
    // anything: its only other occurrence disappears with the region.
    if region.contains(replacement) {
        return false;
    }
    document.contains(replacement)
}

/// One-line change summary between the original and patched document.
pub fn diff_summary(original: &str, patched: &str) -> String {
    let diff = TextDiff::from_lines(original, patched);
    let mut added = 0;
    let mut removed = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    format!("+{added}/-{removed} line(s)")
}
