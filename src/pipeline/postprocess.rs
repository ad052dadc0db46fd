//! Post-processing: deterministic cleanup of text lines pulled out of PDFs.
//!
//! Content streams carry whatever the producing application emitted:
//! runs of spaces used for positioning, tabs, non-breaking spaces, soft
//! hyphens and zero-width characters. None of that belongs in a DOCX
//! paragraph. These rules only touch whitespace and invisible characters,
//! never visible text.
//!
//! ## Rule Order
//!
//! Invisible characters go first so a zero-width space between two blanks
//! does not survive whitespace collapsing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to one extracted line.
///
/// Rules (applied in order):
/// 1. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 2. Collapse whitespace runs (tabs, NBSP, repeated spaces) to one space
/// 3. Trim both ends
pub fn clean_line(input: &str) -> String {
    let s = remove_invisible_chars(input);
    let s = collapse_whitespace(&s);
    s.trim().to_string()
}

/// Clean every line and drop the ones left empty.
pub fn clean_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|l| clean_line(l.as_ref()))
        .filter(|l| !l.is_empty())
        .collect()
}

// ── Rule 1: Remove invisible Unicode characters ──────────────────────────────

static RE_INVISIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{200B}\u{200C}\u{200D}\u{2060}\u{FEFF}\u{00AD}]").unwrap());

fn remove_invisible_chars(input: &str) -> String {
    RE_INVISIBLE.replace_all(input, "").to_string()
}

// ── Rule 2: Collapse whitespace ──────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\u{00A0}]+").unwrap());

fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input, " ").to_string()
}
