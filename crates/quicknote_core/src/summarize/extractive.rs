//! Extractive sentence-picking summary.
//!
//! # Responsibility
//! - Split text into naive sentences and pick first/middle/last.
//!
//! # Invariants
//! - Pure and deterministic: same input, same output.
//! - Inputs with two or fewer sentences are returned unmodified.
//! - Splitting is purely punctuation based; abbreviations, decimals and
//!   quoted punctuation are not special-cased.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence boundary regex"));

/// Splits `text` on runs of `.`, `!` and `?`.
///
/// Fragments are trimmed; empty and whitespace-only fragments are dropped.
/// Source order is preserved.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BOUNDARY_RE
        .split(text)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Builds the extractive summary for `text`.
///
/// Rules:
/// - `<= 2` sentences (including zero): the input text, verbatim.
/// - `3..=4` sentences: `first. middle.` where middle is `sentences[n / 2]`.
/// - `> 4` sentences: `first. middle. last.`
pub fn extractive_summary(text: &str) -> String {
    let sentences = split_sentences(text);
    let count = sentences.len();
    if count <= 2 {
        return text.to_string();
    }

    let mut summary = format!("{}. {}.", sentences[0], sentences[count / 2]);
    if count > 4 {
        summary.push(' ');
        summary.push_str(sentences[count - 1]);
        summary.push('.');
    }
    summary
}
