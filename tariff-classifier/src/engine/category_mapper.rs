//! Category Mapper
//!
//! Maps extracted terms (and an optional industry hint) to broad product
//! categories, each covering a range of four-digit headings. Pure function:
//! the corpus is never consulted here.
//!
//! # Confidence
//! - keyword only: prior + 3 per extra matched keyword (max +6)
//! - hint only: prior - 10
//! - hint and keyword: prior + 10 + extra keyword bonus
//!
//! Hint matching is case-insensitive, accepts containment in either
//! direction, and tolerates near-miss spellings ("Electroncs").

use super::term_extractor::term_matches;
use crate::types::clamp_confidence;
use serde::Serialize;

const HINT_BOOST: f64 = 10.0;
const HINT_ONLY_PENALTY: f64 = 10.0;
const EXTRA_KEYWORD_BONUS: f64 = 3.0;
const MAX_KEYWORD_BONUS: f64 = 6.0;

/// Similarity above which a hint is treated as a misspelling of an alias
const FUZZY_HINT_THRESHOLD: f64 = 0.85;

/// Hints shorter than this only match exactly
const MIN_CONTAINMENT_LEN: usize = 3;

/// Static category definition
#[derive(Debug)]
pub struct CategoryDefinition {
    pub name: &'static str,
    pub code_range_start: &'static str,
    pub code_range_end: &'static str,
    pub keywords: &'static [&'static str],
    pub hint_aliases: &'static [&'static str],
    pub prior: f64,
}

pub const CATEGORY_TABLE: &[CategoryDefinition] = &[
    CategoryDefinition {
        name: "Electronics",
        code_range_start: "8501",
        code_range_end: "8548",
        keywords: &[
            "electronic", "electronics", "circuit", "semiconductor", "battery", "display",
            "led", "transistor", "diode", "charger", "speaker", "headphone", "television",
            "smartphone", "phone",
        ],
        hint_aliases: &["electronics", "technology", "tech", "telecommunications", "consumer electronics"],
        prior: 80.0,
    },
    CategoryDefinition {
        name: "Machinery",
        code_range_start: "8401",
        code_range_end: "8487",
        keywords: &[
            "machine", "machinery", "industrial", "engine", "pump", "bearing", "motor", "valve",
            "compressor", "turbine", "gear", "hydraulic", "conveyor", "computer", "laptop",
        ],
        hint_aliases: &["machinery", "manufacturing", "industrial", "engineering", "equipment"],
        prior: 80.0,
    },
    CategoryDefinition {
        name: "Transportation",
        code_range_start: "8701",
        code_range_end: "8716",
        keywords: &[
            "vehicle", "car", "automotive", "truck", "bicycle", "tire", "tyre", "brake",
            "trailer", "motorcycle", "chassis",
        ],
        hint_aliases: &["automotive", "transportation", "transport", "vehicles", "logistics"],
        prior: 75.0,
    },
    CategoryDefinition {
        name: "Metals",
        code_range_start: "7201",
        code_range_end: "8311",
        keywords: &[
            "steel", "iron", "aluminum", "aluminium", "copper", "metal", "brass", "alloy",
            "bolt", "screw", "nut", "wire", "bracket", "nail", "zinc",
        ],
        hint_aliases: &["metals", "metalworking", "steel", "fabrication", "hardware"],
        prior: 75.0,
    },
    CategoryDefinition {
        name: "Textiles",
        code_range_start: "5001",
        code_range_end: "6310",
        keywords: &[
            "cotton", "textile", "fabric", "shirt", "wool", "yarn", "garment", "apparel",
            "silk", "polyester", "jacket", "dress", "knitted",
        ],
        hint_aliases: &["textiles", "apparel", "fashion", "clothing", "garments"],
        prior: 75.0,
    },
    CategoryDefinition {
        name: "Instruments",
        code_range_start: "9001",
        code_range_end: "9033",
        keywords: &[
            "medical", "optical", "instrument", "microscope", "lens", "syringe", "surgical",
            "thermometer", "meter", "diagnostic", "catheter", "camera",
        ],
        hint_aliases: &["medical", "healthcare", "instruments", "optics", "laboratory"],
        prior: 75.0,
    },
    CategoryDefinition {
        name: "Plastics & Rubber",
        code_range_start: "3901",
        code_range_end: "4017",
        keywords: &[
            "plastic", "polymer", "rubber", "pvc", "polyethylene", "polypropylene", "resin",
            "vinyl", "silicone", "latex", "bottle",
        ],
        hint_aliases: &["plastics", "rubber", "polymers", "packaging"],
        prior: 75.0,
    },
    CategoryDefinition {
        name: "Chemicals",
        code_range_start: "2801",
        code_range_end: "3826",
        keywords: &[
            "chemical", "acid", "solvent", "pharmaceutical", "fertilizer", "paint",
            "detergent", "cosmetic", "adhesive", "pigment", "reagent",
        ],
        hint_aliases: &["chemicals", "chemical", "pharmaceuticals", "pharma", "cosmetics"],
        prior: 70.0,
    },
    CategoryDefinition {
        name: "Furniture",
        code_range_start: "9401",
        code_range_end: "9406",
        keywords: &[
            "furniture", "chair", "table", "desk", "sofa", "bed", "mattress", "cabinet",
            "lamp", "shelf", "wardrobe",
        ],
        hint_aliases: &["furniture", "home furnishings", "interior", "furnishings"],
        prior: 70.0,
    },
    CategoryDefinition {
        name: "Food Products",
        code_range_start: "0201",
        code_range_end: "2209",
        keywords: &[
            "food", "meat", "fish", "fruit", "vegetable", "coffee", "tea", "sugar", "chocolate",
            "beverage", "juice", "wine", "snack", "cheese",
        ],
        hint_aliases: &["food", "beverages", "agriculture", "food and beverage", "grocery"],
        prior: 70.0,
    },
];

/// Category matched for a request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMatch {
    pub name: String,
    pub code_range_start: String,
    pub code_range_end: String,
    pub base_confidence: u8,
    /// Request terms that hit the category's keyword set
    pub matched_terms: Vec<String>,
    /// True when the industry hint selected this category
    pub hint_matched: bool,
}

impl CategoryMatch {
    /// True if the four-digit `heading` falls inside this category's range
    pub fn contains_heading(&self, heading: u32) -> bool {
        let bounds = (
            super::formatter::heading_number(&self.code_range_start),
            super::formatter::heading_number(&self.code_range_end),
        );
        match bounds {
            (Some(start), Some(end)) => heading >= start && heading <= end,
            _ => false,
        }
    }
}

/// True if `hint` names this category (exactly, by containment, or fuzzily)
pub fn hint_matches(definition: &CategoryDefinition, hint: &str) -> bool {
    let hint = hint.trim().to_lowercase();
    if hint.is_empty() {
        return false;
    }

    let name = definition.name.to_lowercase();
    std::iter::once(name.as_str())
        .chain(definition.hint_aliases.iter().copied())
        .any(|alias| {
            if alias == hint {
                return true;
            }
            if hint.len() >= MIN_CONTAINMENT_LEN && (alias.contains(&hint) || hint.contains(alias)) {
                return true;
            }
            if strsim::normalized_levenshtein(&hint, alias) > FUZZY_HINT_THRESHOLD {
                tracing::debug!("Fuzzy matched industry hint '{}' to '{}'", hint, alias);
                return true;
            }
            false
        })
}

/// First category (in table order) named by the hint
pub fn category_for_hint(hint: &str) -> Option<&'static CategoryDefinition> {
    CATEGORY_TABLE.iter().find(|def| hint_matches(def, hint))
}

/// Map terms and optional hint to categories, best first
pub fn map_to_categories(terms: &[String], hint: Option<&str>) -> Vec<CategoryMatch> {
    let mut matches: Vec<CategoryMatch> = CATEGORY_TABLE
        .iter()
        .filter_map(|def| {
            let matched_terms: Vec<String> = terms
                .iter()
                .filter(|t| def.keywords.iter().any(|k| term_matches(t, k)))
                .cloned()
                .collect();
            let hint_matched = hint.is_some_and(|h| hint_matches(def, h));

            if matched_terms.is_empty() && !hint_matched {
                return None;
            }

            let keyword_bonus = (matched_terms.len().saturating_sub(1) as f64
                * EXTRA_KEYWORD_BONUS)
                .min(MAX_KEYWORD_BONUS);
            let confidence = match (matched_terms.is_empty(), hint_matched) {
                (false, true) => def.prior + HINT_BOOST + keyword_bonus,
                (false, false) => def.prior + keyword_bonus,
                _ => def.prior - HINT_ONLY_PENALTY,
            };

            Some(CategoryMatch {
                name: def.name.to_string(),
                code_range_start: def.code_range_start.to_string(),
                code_range_end: def.code_range_end.to_string(),
                base_confidence: clamp_confidence(confidence),
                matched_terms,
                hint_matched,
            })
        })
        .collect();

    // Stable: equal confidences keep table order
    matches.sort_by(|a, b| b.base_confidence.cmp(&a.base_confidence));
    matches
}
