//! Query normalization ahead of embedding
//!
//! Widget visitors type fast and loose; a handful of recurring typos and
//! under-specified phrasings measurably hurt recall. Normalization is a pure
//! string-to-string step: one optional phrase expansion, then token-level
//! typo correction. On no match the query passes through unchanged.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Multi-word phrases replaced by a widened set of synonymous terms.
/// Checked against the lower-cased query; the first match wins and at most
/// one expansion is applied.
const PHRASE_EXPANSIONS: &[(&str, &str)] = &[
    (
        "how long",
        "how long how much time duration turnaround delivery time",
    ),
    (
        "opening hours",
        "opening hours business hours schedule when are you open",
    ),
    (
        "how much",
        "how much price cost fee pricing",
    ),
];

/// Single-token misspellings seen in real widget traffic.
static TYPO_CORRECTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("teh", "the"),
        ("wat", "what"),
        ("wich", "which"),
        ("recieve", "receive"),
        ("adress", "address"),
        ("shiping", "shipping"),
        ("cancle", "cancel"),
        ("refnd", "refund"),
        ("acount", "account"),
        ("pasword", "password"),
        ("payed", "paid"),
        ("garantee", "guarantee"),
    ])
});

/// Normalize a raw visitor query for embedding.
///
/// The expansion step runs on the whole string before tokenization, so the
/// words an expansion introduces are never themselves typo-corrected.
pub fn normalize(query: &str) -> String {
    let expanded = expand_phrases(query);
    correct_typos(&expanded)
}

fn expand_phrases(query: &str) -> String {
    let lowered = query.to_lowercase();

    for (phrase, expansion) in PHRASE_EXPANSIONS {
        if lowered.contains(phrase) {
            return lowered.replacen(phrase, expansion, 1);
        }
    }

    query.to_string()
}

fn correct_typos(query: &str) -> String {
    query
        .split_whitespace()
        .map(correct_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Correct one whitespace token, keeping any trailing punctuation intact
/// ("cancle?" becomes "cancel?").
fn correct_token(token: &str) -> String {
    let trimmed = token.trim_end_matches(|c: char| c.is_ascii_punctuation());
    let punctuation = &token[trimmed.len()..];

    match TYPO_CORRECTIONS.get(trimmed.to_lowercase().as_str()) {
        Some(correction) => format!("{}{}", correction, punctuation),
        None => token.to_string(),
    }
}
