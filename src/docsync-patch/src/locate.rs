//! Anchor location: exact substring search with a fuzzy region fallback.
//!
//! Edits arrive with anchors that are supposed to occur verbatim in the
//! document but often do not: truncation, re-wrapped whitespace, ellipses.
//! Exact location is always tried first. When it fails, the fuzzy locator
//! scores candidate regions (paragraphs, then single lines) by word-token
//! overlap with the anchor and returns the first region that clears the
//! requested threshold.

use crate::normalize::normalize;
use std::collections::HashSet;

/// Thresholds and limits for fuzzy region location.
#[derive(Debug, Clone)]
pub struct FuzzyConfig {
    /// Similarity at or above which a match applies silently.
    pub high: f64,
    /// Similarity at or above which a match applies with a low-confidence flag.
    pub medium: f64,
    /// Similarity at or above which a match applies with a loud diagnostic.
    pub low: f64,
    /// Minimum normalized anchor length (in characters) for fuzzy matching.
    /// Shorter anchors are too ambiguous to score and only match exactly.
    pub min_anchor_chars: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            high: 0.8,
            medium: 0.7,
            low: 0.5,
            min_anchor_chars: 20,
        }
    }
}

impl FuzzyConfig {
    /// The thresholds in escalation order, highest first.
    pub fn tiers(&self) -> [f64; 3] {
        [self.high, self.medium, self.low]
    }

    /// Map a similarity score to its confidence tier.
    pub fn confidence_for(&self, similarity: f64) -> Confidence {
        if similarity >= self.high {
            Confidence::FuzzyHigh
        } else if similarity >= self.medium {
            Confidence::FuzzyMedium
        } else {
            Confidence::FuzzyLow
        }
    }
}

/// The matching strategy that located a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// The anchor occurred verbatim.
    Exact,
    /// Word-overlap similarity at or above the high threshold.
    FuzzyHigh,
    /// Word-overlap similarity at or above the medium threshold.
    FuzzyMedium,
    /// Word-overlap similarity at or above the low threshold.
    FuzzyLow,
}

impl Confidence {
    /// Check if this is an exact match.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact)
    }
}

/// A region of the document resolved for an edit.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The document text that will be replaced: the verbatim anchor for an
    /// exact match, the full matched region for a fuzzy one.
    pub matched_text: String,
    /// Byte offset of the region in the document.
    pub start_offset: usize,
    /// How the region was located.
    pub confidence: Confidence,
}

/// Find the first byte offset where `anchor` occurs verbatim in `document`.
pub fn find_exact(anchor: &str, document: &str) -> Option<usize> {
    if anchor.is_empty() {
        return None;
    }
    document.find(anchor)
}

/// Fuzzy region locator over paragraph and line granularity.
#[derive(Debug, Clone, Default)]
pub struct RegionLocator {
    config: FuzzyConfig,
}

impl RegionLocator {
    /// Create a locator with the given configuration.
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    /// Find the best-matching region for `anchor` at the given threshold.
    ///
    /// Paragraphs (blank-line separated) are scored first; if none qualifies,
    /// individual non-blank lines are scored the same way. The first region in
    /// document order that reaches `threshold` wins; there is no best-match
    /// search over an ambiguous edit source.
    pub fn find_fuzzy(&self, anchor: &str, document: &str, threshold: f64) -> Option<MatchResult> {
        let normalized = normalize(anchor);
        if normalized.chars().count() < self.config.min_anchor_chars {
            return None;
        }
        let anchor_tokens: Vec<&str> = normalized.split_whitespace().collect();
        if anchor_tokens.is_empty() {
            return None;
        }

        for (offset, paragraph) in paragraphs(document) {
            if let Some(result) = self.score_region(&anchor_tokens, paragraph, offset, threshold) {
                return Some(result);
            }
        }

        for (offset, line) in non_blank_lines(document) {
            if let Some(result) = self.score_region(&anchor_tokens, line, offset, threshold) {
                return Some(result);
            }
        }

        None
    }

    fn score_region(
        &self,
        anchor_tokens: &[&str],
        region: &str,
        offset: usize,
        threshold: f64,
    ) -> Option<MatchResult> {
        let similarity = word_overlap(anchor_tokens, region);
        if similarity >= threshold {
            Some(MatchResult {
                matched_text: region.to_string(),
                start_offset: offset,
                confidence: self.config.confidence_for(similarity),
            })
        } else {
            None
        }
    }
}

/// Fraction of anchor word-tokens that also occur as tokens in `region`.
fn word_overlap(anchor_tokens: &[&str], region: &str) -> f64 {
    let normalized = normalize(region);
    let region_tokens: HashSet<&str> = normalized.split_whitespace().collect();
    let hits = anchor_tokens
        .iter()
        .filter(|&&token| region_tokens.contains(token))
        .count();
    hits as f64 / anchor_tokens.len() as f64
}

/// Blank-line separated paragraphs with their byte offsets.
/// Whitespace-only segments are not candidate regions.
pub(crate) fn paragraphs(document: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for part in document.split("\n\n") {
        if !part.trim().is_empty() {
            out.push((offset, part));
        }
        offset += part.len() + 2;
    }
    out
}

/// Non-blank lines with their byte offsets.
fn non_blank_lines(document: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for line in document.split('\n') {
        if !line.trim().is_empty() {
            out.push((offset, line));
        }
        offset += line.len() + 1;
    }
    out
}
