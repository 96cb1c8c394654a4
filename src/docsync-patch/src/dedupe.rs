//! Hierarchical edit deduplication over chapter numbering.
//!
//! An edit targeting a whole chapter already subsumes any edit targeting one
//! of its subsections; applying both would double-count or corrupt the
//! region. Containment is decided from heading chapter numbers alone: "3.1"
//! is a strict descendant of "3", so its edit is dropped when both appear in
//! one batch.

use crate::edit::EditRequest;
use crate::section::{parse_heading, HeadingInfo};

/// Remove edits whose target section is wholly contained in another edit's
/// target section.
///
/// Returns the surviving edits in their original order, plus the subsumed
/// ones. Non-heading edits and headings without a parseable chapter numeral
/// are never removed.
pub fn dedupe_hierarchical(edits: &[EditRequest]) -> (Vec<EditRequest>, Vec<EditRequest>) {
    let headings: Vec<Option<HeadingInfo>> = edits.iter().map(heading_of).collect();
    let mut subsumed = vec![false; edits.len()];

    for (i, parent) in headings.iter().enumerate() {
        let Some(parent) = parent else { continue };
        let Some(parent_number) = &parent.chapter_number else {
            continue;
        };
        let prefix = format!("{parent_number}.");

        for (j, child) in headings.iter().enumerate() {
            if i == j {
                continue;
            }
            let Some(child) = child else { continue };
            let Some(child_number) = &child.chapter_number else {
                continue;
            };
            if child.level > parent.level && child_number.starts_with(&prefix) {
                subsumed[j] = true;
            }
        }
    }

    let mut kept = Vec::new();
    let mut removed = Vec::new();
    for (edit, is_subsumed) in edits.iter().zip(&subsumed) {
        if *is_subsumed {
            removed.push(edit.clone());
        } else {
            kept.push(edit.clone());
        }
    }
    (kept, removed)
}

fn heading_of(edit: &EditRequest) -> Option<HeadingInfo> {
    parse_heading(edit.heading_line()?)
}
