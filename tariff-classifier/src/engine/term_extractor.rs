//! Term Extractor
//!
//! Normalizes a free-text description into an ordered, de-duplicated list of
//! search terms. Technical terms (curated domain vocabulary, long words, or
//! words with a technical suffix) are ranked ahead of general terms.

use std::collections::HashSet;

/// Maximum number of terms returned by `extract_terms`
pub const MAX_TERMS: usize = 12;

/// Tokens of this length or shorter are dropped
const MIN_TOKEN_LEN: usize = 2;

/// Minimum length (exclusive) for a word to count as technical by length alone
const TECHNICAL_LEN: usize = 6;

const TECHNICAL_SUFFIXES: &[&str] = &["ing", "tion", "ment", "er", "ly"];

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "are", "was", "were", "has", "have",
    "had", "not", "but", "all", "any", "can", "its", "our", "your", "their", "into", "onto",
    "over", "under", "per", "each", "other", "than", "then", "also", "such", "very", "used",
    "use", "using", "made", "make", "new", "set", "kit", "type", "item", "items", "product",
    "products", "etc", "inc", "ltd", "pcs", "unit", "units",
];

/// Curated vocabulary that always counts as technical
const DOMAIN_TERMS: &[&str] = &[
    "steel", "iron", "alloy", "copper", "aluminum", "aluminium", "brass", "motor", "pump",
    "valve", "gear", "shaft", "circuit", "sensor", "chip", "laptop", "cable", "wire", "lens",
    "resin", "polymer", "cotton", "fiber", "fibre", "nylon", "rubber", "glass", "ceramic",
    "engine", "turbine", "diode", "relay", "syringe", "catheter", "tire", "tyre",
];

/// Split text into normalized tokens
///
/// Lower-cases, turns punctuation into whitespace, and drops short tokens and
/// stop words. Order and repeats are preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|t| t.chars().count() > MIN_TOKEN_LEN)
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// True if `token` is `keyword` or a simple plural of it (or vice versa)
pub fn term_matches(token: &str, keyword: &str) -> bool {
    if token == keyword {
        return true;
    }
    let plural_of = |long: &str, short: &str| {
        long.strip_prefix(short)
            .is_some_and(|rest| rest == "s" || rest == "es")
    };
    plural_of(token, keyword) || plural_of(keyword, token)
}

fn is_technical(token: &str) -> bool {
    DOMAIN_TERMS.contains(&token)
        || token.chars().count() > TECHNICAL_LEN
        || TECHNICAL_SUFFIXES.iter().any(|s| token.ends_with(s))
}

/// Extract ranked search terms from a product description
///
/// Returns an empty vector for empty or whitespace-only input, which the
/// orchestrator treats as "fallback only".
pub fn extract_terms(description: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut technical = Vec::new();
    let mut general = Vec::new();

    for token in tokenize(description) {
        if !seen.insert(token.clone()) {
            continue;
        }
        if is_technical(&token) {
            technical.push(token);
        } else {
            general.push(token);
        }
    }

    technical.extend(general);
    technical.truncate(MAX_TERMS);
    technical
}
