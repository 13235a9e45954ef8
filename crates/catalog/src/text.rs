//! Identifier and query-text normalization helpers.
//!
//! Both the in-memory catalog and the tiered matcher normalize through these
//! functions so lookup keys agree on both sides of the port.

/// Case- and whitespace-normalize an identifier: trim, lowercase, collapse
/// interior whitespace runs to single spaces.
pub fn normalize_identifier(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Aggressive identifier squash for fuzzy comparison: lowercase and strip
/// spaces, dashes, and underscores entirely.
pub fn squash_identifier(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split free text into lowercase alphanumeric terms. Punctuation is a
/// delimiter; single-character terms are dropped as noise.
pub fn tokenize_terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .collect()
}
