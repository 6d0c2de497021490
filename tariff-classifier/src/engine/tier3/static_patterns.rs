//! Static pattern table
//!
//! Last resort before manual review. Single-word product nouns map to one
//! representative code each. The first keyword in table order wins, so at
//! most one candidate is emitted.

use crate::config::StaticPatternConfig;
use crate::engine::category_mapper::category_for_hint;
use crate::engine::term_extractor::{term_matches, tokenize};
use crate::engine::{ClassificationContext, ClassificationStrategy, StrategyError};
use crate::types::{ClassificationCandidate, ClassificationRequest, SourceTier};
use async_trait::async_trait;
use tracing::debug;

/// Static table entry
#[derive(Debug)]
pub struct StaticPattern {
    pub keyword: &'static str,
    pub code: &'static str,
    pub description: &'static str,
    /// Category name (matches the category table)
    pub category: &'static str,
}

const fn pattern(
    keyword: &'static str,
    code: &'static str,
    description: &'static str,
    category: &'static str,
) -> StaticPattern {
    StaticPattern {
        keyword,
        code,
        description,
        category,
    }
}

pub const STATIC_PATTERNS: &[StaticPattern] = &[
    // Electronics
    pattern("laptop", "847130", "Portable automatic data processing machines", "Electronics"),
    pattern("phone", "851713", "Smartphones", "Electronics"),
    pattern("headphones", "851830", "Headphones and earphones", "Electronics"),
    pattern("battery", "850760", "Lithium-ion accumulators", "Electronics"),
    pattern("television", "852872", "Reception apparatus for television", "Electronics"),
    // Automotive
    pattern("car", "870323", "Motor cars with spark-ignition engines", "Transportation"),
    pattern("tire", "401110", "New pneumatic tyres for motor cars", "Transportation"),
    pattern("bicycle", "871200", "Bicycles and other cycles", "Transportation"),
    // Machinery
    pattern("pump", "841370", "Centrifugal pumps", "Machinery"),
    pattern("bearing", "848210", "Ball bearings", "Machinery"),
    pattern("valve", "848180", "Taps, cocks and valves", "Machinery"),
    // Metals
    pattern("bolt", "731815", "Threaded bolts of iron or steel", "Metals"),
    // Textiles
    pattern("shirt", "610910", "T-shirts of cotton, knitted", "Textiles"),
    pattern("jacket", "620193", "Jackets of synthetic fibres", "Textiles"),
    pattern("shoes", "640399", "Footwear with leather uppers", "Textiles"),
    // Medical
    pattern("syringe", "901831", "Syringes, with or without needles", "Instruments"),
    pattern("bandage", "300590", "Wadding, gauze and bandages", "Instruments"),
    // Other
    pattern("bottle", "392330", "Carboys, bottles and flasks of plastics", "Plastics & Rubber"),
    pattern("detergent", "340220", "Washing and cleaning preparations", "Chemicals"),
    pattern("chair", "940171", "Upholstered seats with metal frames", "Furniture"),
    pattern("coffee", "090121", "Roasted coffee, not decaffeinated", "Food Products"),
];

/// Tier 3: static keyword table with hint and manual-review fallbacks
///
/// Never returns an empty list.
pub struct StaticPatternStrategy {
    config: StaticPatternConfig,
}

impl StaticPatternStrategy {
    pub fn new(config: StaticPatternConfig) -> Self {
        Self { config }
    }

    /// Match a request against the static table
    pub fn match_patterns(&self, request: &ClassificationRequest) -> ClassificationCandidate {
        let tokens = tokenize(&request.description);

        let keyword_hit = STATIC_PATTERNS
            .iter()
            .find(|p| tokens.iter().any(|t| term_matches(t, p.keyword)));
        if let Some(p) = keyword_hit {
            if let Some(c) = self.candidate(p, self.config.static_confidence) {
                return c.with_matched_terms(vec![p.keyword.to_string()]);
            }
        }

        if let Some(hint) = request.hint() {
            let hint_entry = category_for_hint(hint)
                .and_then(|def| STATIC_PATTERNS.iter().find(|p| p.category == def.name));
            if let Some(p) = hint_entry {
                debug!(hint, code = p.code, "Static table matched industry hint");
                if let Some(c) = self.candidate(p, self.config.hint_confidence) {
                    return c;
                }
            }
        }

        ClassificationCandidate::manual_review(self.config.manual_review_confidence)
    }

    fn candidate(&self, p: &StaticPattern, confidence: u8) -> Option<ClassificationCandidate> {
        ClassificationCandidate::new(p.code, p.description, f64::from(confidence), SourceTier::Static)
            .map(|c| c.with_category(p.category))
    }
}

#[async_trait]
impl ClassificationStrategy for StaticPatternStrategy {
    fn name(&self) -> &'static str {
        "static_patterns"
    }

    fn tier(&self) -> SourceTier {
        SourceTier::Static
    }

    async fn classify(
        &self,
        ctx: &ClassificationContext,
    ) -> Result<Vec<ClassificationCandidate>, StrategyError> {
        Ok(vec![self.match_patterns(&ctx.request)])
    }
}
