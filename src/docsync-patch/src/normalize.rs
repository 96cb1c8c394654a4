//! Text canonicalization for anchor comparison.
//!
//! The upstream edit proposer re-renders text freely: ellipses stand in for
//! elided content, line breaks move, indentation changes. Comparison therefore
//! happens on a canonical form. Substitution never does; the patch applier
//! always replaces original, non-normalized document text.

/// Canonicalize text for comparison.
///
/// Literal ellipsis sequences (`...`, `…`) become a single space, every
/// whitespace run (including newlines) collapses to a single space, and
/// leading/trailing whitespace is trimmed.
///
/// Pure and idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let stripped = text.replace('…', " ").replace("...", " ");

    let mut out = String::with_capacity(stripped.len());
    let mut last_was_space = false;
    for ch in stripped.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }

    out.trim().to_string()
}
