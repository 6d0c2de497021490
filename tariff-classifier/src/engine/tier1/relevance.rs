//! Relevance scoring for corpus entries
//!
//! Score components (0-100 scale, weights from `RelevanceWeights`):
//! - containment: normalized request text inside entry text, or vice versa
//! - overlap: Jaccard overlap of request terms and entry tokens
//! - repeat: extra occurrences of the dominant (first) term
//! - industry: entry heading inside a hint-selected category
//! - origin: share of the category confidence (category sweep) or a flat
//!   premium bonus (premium subset)

use crate::config::RelevanceWeights;
use crate::engine::category_mapper::CategoryMatch;
use crate::engine::formatter::heading_number;
use crate::engine::term_extractor::{term_matches, tokenize};
use crate::types::{clamp_confidence, ReferenceEntry};

/// How an entry reached the candidate pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryOrigin {
    Premium,
    /// Category sweep, carrying the category's confidence
    Category { confidence: u8 },
    Term,
}

/// Scored entry breakdown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelevanceScore {
    pub containment: f64,
    pub overlap: f64,
    pub repeat: f64,
    pub industry: f64,
    pub origin: f64,
    /// Request terms found in the entry
    pub matched_terms: Vec<String>,
}

impl RelevanceScore {
    pub fn total(&self) -> f64 {
        self.containment + self.overlap + self.repeat + self.industry + self.origin
    }

    /// True if the entry text itself supports the match
    pub fn has_textual_evidence(&self) -> bool {
        self.containment > 0.0 || self.overlap > 0.0
    }
}

/// Score one entry against the request
pub fn score_entry(
    entry: &ReferenceEntry,
    description: &str,
    terms: &[String],
    categories: &[CategoryMatch],
    origin: EntryOrigin,
    weights: &RelevanceWeights,
) -> RelevanceScore {
    let entry_tokens = tokenize(&entry.description);
    let mut score = RelevanceScore::default();

    let request_tokens = tokenize(description);
    if contains_phrase(&entry_tokens, &request_tokens)
        || contains_phrase(&request_tokens, &entry_tokens)
    {
        score.containment = weights.containment;
    }

    score.matched_terms = terms
        .iter()
        .filter(|t| entry_tokens.iter().any(|tok| term_matches(tok, t)))
        .cloned()
        .collect();
    if !score.matched_terms.is_empty() {
        let mut unique_tokens = entry_tokens.clone();
        unique_tokens.sort();
        unique_tokens.dedup();
        let intersection = score.matched_terms.len() as f64;
        let union = (terms.len() + unique_tokens.len()) as f64 - intersection;
        if union > 0.0 {
            score.overlap = weights.overlap * (intersection / union);
        }
    }

    if let Some(dominant) = terms.first() {
        let occurrences = entry_tokens
            .iter()
            .filter(|tok| term_matches(tok, dominant))
            .count();
        if occurrences > 1 {
            score.repeat =
                ((occurrences - 1) as f64 * weights.repeat_per_occurrence).min(weights.repeat_cap);
        }
    }

    if let Some(heading) = heading_number(&entry.code) {
        if categories
            .iter()
            .any(|c| c.hint_matched && c.contains_heading(heading))
        {
            score.industry = weights.industry_alignment;
        }
    }

    score.origin = match origin {
        EntryOrigin::Premium => weights.premium,
        EntryOrigin::Category { confidence } => f64::from(confidence) * weights.category_origin,
        EntryOrigin::Term => 0.0,
    };

    score
}

/// True if `needle` occurs in `haystack` as a run of whole tokens
fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Map a relevance score onto the `[floor, ceiling]` confidence band
pub fn score_to_confidence(total: f64, floor: u8, ceiling: u8) -> u8 {
    let fraction = (total / 100.0).clamp(0.0, 1.0);
    let span = f64::from(ceiling.saturating_sub(floor));
    clamp_confidence(f64::from(floor) + fraction * span).clamp(floor, ceiling)
}
