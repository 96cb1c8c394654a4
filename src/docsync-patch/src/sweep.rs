//! Post-application duplicate paragraph removal.
//!
//! Independent edits occasionally introduce text that duplicates material
//! already present elsewhere in the document. The sweep runs once after all
//! edits have been applied and drops any paragraph whose signature repeats an
//! earlier paragraph's. A cheap safety net layered over the collision guard,
//! not a substitute for correct patch application.

use crate::normalize::normalize;
use std::collections::HashSet;

/// Paragraph signature length, in normalized characters.
pub const SIGNATURE_CHARS: usize = 100;

/// Drop paragraphs that literally duplicate an earlier paragraph.
///
/// Paragraphs are blank-line separated; the signature is the first
/// [`SIGNATURE_CHARS`] characters of the normalized paragraph. Single pass,
/// order-preserving for retained paragraphs. Whitespace-only paragraphs are
/// kept; folding them together would rewrite document spacing.
///
/// Returns the swept document and the number of paragraphs removed.
pub fn sweep(document: &str) -> (String, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();
    let mut dropped = 0;

    for paragraph in document.split("\n\n") {
        let signature: String = normalize(paragraph).chars().take(SIGNATURE_CHARS).collect();
        if signature.is_empty() || seen.insert(signature) {
            kept.push(paragraph);
        } else {
            dropped += 1;
        }
    }

    (kept.join("\n\n"), dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_drops_literal_duplicate() {
        let doc = "first paragraph\n\nsecond paragraph\n\nfirst paragraph";
        let (swept, dropped) = sweep(doc);
        assert_eq!(swept, "first paragraph\n\nsecond paragraph");
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_keeps_unique_paragraphs() {
        let doc = "one\n\ntwo\n\nthree";
        let (swept, dropped) = sweep(doc);
        assert_eq!(swept, doc);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_signature_ignores_formatting() {
        // Same words, different wrapping: the normalized signature matches.
        let doc = "the same  paragraph text\n\nthe same\nparagraph text";
        let (swept, dropped) = sweep(doc);
        assert_eq!(swept, "the same  paragraph text");
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_long_paragraphs_compared_by_prefix() {
        let shared: String = "word ".repeat(40);
        let a = format!("{shared}tail one");
        let b = format!("{shared}tail two");
        // Both normalize past 100 characters with an identical prefix.
        let doc = format!("{a}\n\n{b}");
        let (_, dropped) = sweep(&doc);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_whitespace_only_paragraphs_survive() {
        let doc = "real paragraph\n\n  \n\n  \n\nanother one";
        let (swept, dropped) = sweep(doc);
        assert_eq!(swept, doc);
        assert_eq!(dropped, 0);
    }
}
