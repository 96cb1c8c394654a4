//! Markdown heading parsing and section scope expansion.
//!
//! An edit that targets a whole chapter frequently arrives anchored to the
//! bare heading line. Expansion turns such an anchor into the full section
//! body: everything from the heading up to the next heading of equal or
//! higher rank.

/// Metadata derived from a `#`-prefixed heading line. Never stored, only
/// parsed on demand from edit anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingInfo {
    /// Heading rank, 1..=6, from the leading `#` run.
    pub level: usize,
    /// Leading dotted numeral ("3", "3.1") when the heading carries one.
    pub chapter_number: Option<String>,
}

/// Parse a heading line into its level and optional chapter number.
///
/// Returns `None` for lines that are not Markdown headings (no leading `#`
/// run, or a run longer than six).
pub fn parse_heading(line: &str) -> Option<HeadingInfo> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let rest = trimmed[level..].trim_start();
    let chapter_number = rest.split_whitespace().next().and_then(parse_chapter_number);

    Some(HeadingInfo {
        level,
        chapter_number,
    })
}

/// Accept dotted numerals like "3", "3.1", "2.10.4", tolerating one trailing
/// dot ("3." in enumerated headings).
fn parse_chapter_number(token: &str) -> Option<String> {
    let token = token.strip_suffix('.').unwrap_or(token);
    if token.is_empty() {
        return None;
    }
    let mut last_was_dot = true;
    for c in token.chars() {
        match c {
            '0'..='9' => last_was_dot = false,
            '.' if !last_was_dot => last_was_dot = true,
            _ => return None,
        }
    }
    if last_was_dot {
        return None;
    }
    Some(token.to_string())
}

/// Expand a heading anchor into the full text of its section.
///
/// The section runs from the anchor's start to the next line whose own
/// leading `#` run is no longer than the anchor's (exclusive), or to the end
/// of the document. The result is trimmed of trailing whitespace.
///
/// Expansion is a best-effort enhancement: when the anchor cannot be located
/// verbatim, the anchor is returned unchanged rather than failing the edit.
pub fn expand_section(document: &str, heading_anchor: &str) -> String {
    match section_span(document, heading_anchor) {
        Some((start, end)) => document[start..end].trim_end().to_string(),
        None => heading_anchor.to_string(),
    }
}

fn section_span(document: &str, heading_anchor: &str) -> Option<(usize, usize)> {
    let anchor = heading_anchor.trim();
    if !anchor.starts_with('#') {
        return None;
    }
    let start = document.find(anchor)?;
    let level = anchor.chars().take_while(|&c| c == '#').count();

    // Step past the remainder of the line the anchor ends on.
    let after = start + anchor.len();
    let mut pos = match document[after..].find('\n') {
        Some(i) => after + i + 1,
        None => return Some((start, document.len())),
    };

    loop {
        let rest = &document[pos..];
        if rest.is_empty() {
            return Some((start, document.len()));
        }
        let line = rest.split('\n').next().unwrap_or(rest);
        let hashes = line.chars().take_while(|&c| c == '#').count();
        if hashes > 0 && hashes <= level {
            return Some((start, pos));
        }
        match rest.find('\n') {
            Some(i) => pos += i + 1,
            None => return Some((start, document.len())),
        }
    }
}
