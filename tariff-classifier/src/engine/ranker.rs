//! Scorer & Ranker
//!
//! Groups candidates by canonical code, keeps the strongest of each group,
//! orders the survivors and truncates to the result limit.
//!
//! Ordering: confidence descending, then tier priority, then first appearance.

use crate::types::ClassificationCandidate;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Deduplicate by `code` and return the top `limit` candidates
pub fn rank_and_dedupe(
    candidates: Vec<ClassificationCandidate>,
    limit: usize,
) -> Vec<ClassificationCandidate> {
    // (first appearance index, best candidate so far)
    let mut groups: Vec<(usize, ClassificationCandidate)> = Vec::new();
    let mut by_code: HashMap<String, usize> = HashMap::new();

    for (index, candidate) in candidates.into_iter().enumerate() {
        match by_code.get(&candidate.code) {
            Some(&slot) => {
                let current = &groups[slot].1;
                let stronger = (candidate.confidence, candidate.source_tier.priority())
                    > (current.confidence, current.source_tier.priority());
                if stronger {
                    groups[slot].1 = candidate;
                }
            }
            None => {
                by_code.insert(candidate.code.clone(), groups.len());
                groups.push((index, candidate));
            }
        }
    }

    groups.sort_by_key(|(first_seen, c)| {
        (Reverse(c.confidence), Reverse(c.source_tier.priority()), *first_seen)
    });

    groups
        .into_iter()
        .take(limit)
        .map(|(_, c)| c)
        .collect()
}
