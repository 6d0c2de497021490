//! Algorithmic code generator
//!
//! Material rules are checked first and start at `material_start`; function
//! rules only fill the slots left over and start at `function_start`. Within a
//! rule each further code loses `decrement` points.
//!
//! Pure and deterministic: same description, same candidates. The industry
//! hint is deliberately not consulted.

use crate::config::AlgorithmicConfig;
use crate::engine::term_extractor::{term_matches, tokenize};
use crate::engine::{ClassificationContext, ClassificationStrategy, StrategyError};
use crate::types::{ClassificationCandidate, SourceTier};
use async_trait::async_trait;

/// Keyword rule emitting an ordered list of codes
#[derive(Debug)]
pub struct CodeRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    /// (raw code, description), most specific first
    pub codes: &'static [(&'static str, &'static str)],
}

impl CodeRule {
    fn matches(&self, tokens: &[String]) -> bool {
        tokens
            .iter()
            .any(|t| self.keywords.iter().any(|k| term_matches(t, k)))
    }
}

pub const MATERIAL_RULES: &[CodeRule] = &[
    CodeRule {
        name: "Iron & Steel",
        keywords: &["steel", "iron", "stainless", "galvanized", "cast"],
        codes: &[
            ("7208", "Flat-rolled products of iron or non-alloy steel"),
            ("7318", "Screws, bolts, nuts and similar articles of iron or steel"),
            ("7326", "Other articles of iron or steel"),
            ("7308", "Structures and parts of structures of iron or steel"),
        ],
    },
    CodeRule {
        name: "Aluminium",
        keywords: &["aluminum", "aluminium"],
        codes: &[
            ("7606", "Aluminium plates, sheets and strip"),
            ("7610", "Aluminium structures and parts of structures"),
            ("7616", "Other articles of aluminium"),
        ],
    },
    CodeRule {
        name: "Copper Alloys",
        keywords: &["copper", "brass", "bronze"],
        codes: &[
            ("7407", "Copper bars, rods and profiles"),
            ("7411", "Copper tubes and pipes"),
            ("7419", "Other articles of copper"),
        ],
    },
    CodeRule {
        name: "Plastics",
        keywords: &["plastic", "polymer", "pvc", "polyethylene", "polypropylene", "acrylic"],
        codes: &[
            ("3920", "Other plates, sheets, film and foil of plastics"),
            ("3923", "Articles for the conveyance or packing of goods, of plastics"),
            ("3926", "Other articles of plastics"),
        ],
    },
    CodeRule {
        name: "Wood",
        keywords: &["wood", "wooden", "timber", "plywood", "bamboo", "oak", "pine"],
        codes: &[
            ("4407", "Wood sawn or chipped lengthwise"),
            ("4412", "Plywood, veneered panels and similar laminated wood"),
            ("4421", "Other articles of wood"),
        ],
    },
    CodeRule {
        name: "Glass",
        keywords: &["glass", "glassware"],
        codes: &[
            ("7005", "Float glass and surface ground or polished glass"),
            ("7013", "Glassware for table, kitchen and toilet use"),
            ("7020", "Other articles of glass"),
        ],
    },
    CodeRule {
        name: "Ceramics",
        keywords: &["ceramic", "porcelain", "stoneware", "earthenware"],
        codes: &[
            ("6907", "Ceramic flags and paving, hearth or wall tiles"),
            ("6911", "Tableware and kitchenware of porcelain or china"),
            ("6914", "Other ceramic articles"),
        ],
    },
    CodeRule {
        name: "Rubber",
        keywords: &["rubber", "latex", "silicone", "neoprene"],
        codes: &[
            ("4016", "Other articles of vulcanised rubber"),
            ("4011", "New pneumatic tyres, of rubber"),
            ("4009", "Tubes, pipes and hoses of vulcanised rubber"),
        ],
    },
    CodeRule {
        name: "Textile Fibres",
        keywords: &["cotton", "wool", "silk", "polyester", "nylon", "linen", "fabric", "textile"],
        codes: &[
            ("5208", "Woven fabrics of cotton"),
            ("5407", "Woven fabrics of synthetic filament yarn"),
            ("6307", "Other made up textile articles"),
        ],
    },
];

pub const FUNCTION_RULES: &[CodeRule] = &[
    CodeRule {
        name: "Electronic",
        keywords: &[
            "electronic", "computer", "laptop", "notebook", "tablet", "phone", "smartphone",
            "circuit", "semiconductor", "processor", "digital",
        ],
        codes: &[
            ("8471", "Automatic data processing machines and units thereof"),
            ("8517", "Telephone sets and apparatus for transmission of voice or data"),
            ("8542", "Electronic integrated circuits"),
        ],
    },
    CodeRule {
        name: "Mechanical",
        keywords: &[
            "mechanical", "bearing", "gear", "pump", "valve", "engine", "machine", "compressor",
            "hydraulic",
        ],
        codes: &[
            ("8483", "Transmission shafts, bearing housings and gears"),
            ("8482", "Ball or roller bearings"),
            ("8413", "Pumps for liquids"),
            ("8481", "Taps, cocks, valves and similar appliances"),
        ],
    },
    CodeRule {
        name: "Electrical",
        keywords: &[
            "electrical", "electric", "motor", "wire", "cable", "battery", "switch",
            "transformer", "charger",
        ],
        codes: &[
            ("8501", "Electric motors and generators"),
            ("8544", "Insulated wire and cable"),
            ("8536", "Electrical apparatus for switching or protecting circuits"),
            ("8507", "Electric accumulators"),
        ],
    },
    CodeRule {
        name: "Optical",
        keywords: &["optical", "lens", "camera", "microscope", "telescope", "laser", "binoculars"],
        codes: &[
            ("9002", "Lenses, prisms and other optical elements, mounted"),
            ("9006", "Photographic cameras"),
            ("9013", "Lasers and other optical appliances"),
        ],
    },
    CodeRule {
        name: "Medical",
        keywords: &[
            "medical", "surgical", "syringe", "catheter", "diagnostic", "hospital", "dental",
            "orthopedic",
        ],
        codes: &[
            ("9018", "Instruments and appliances used in medical or surgical sciences"),
            ("9019", "Mechano-therapy and respiration apparatus"),
            ("9021", "Orthopaedic appliances"),
        ],
    },
];

/// Tier 2: rule-based code generator
pub struct AlgorithmicStrategy {
    config: AlgorithmicConfig,
}

impl AlgorithmicStrategy {
    pub fn new(config: AlgorithmicConfig) -> Self {
        Self { config }
    }

    /// Generate candidates from the description alone
    pub fn generate(&self, description: &str) -> Vec<ClassificationCandidate> {
        let tokens = tokenize(description);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        self.apply_rules(MATERIAL_RULES, &tokens, self.config.material_start, &mut candidates);
        self.apply_rules(FUNCTION_RULES, &tokens, self.config.function_start, &mut candidates);
        candidates
    }

    fn apply_rules(
        &self,
        rules: &[CodeRule],
        tokens: &[String],
        start: u8,
        out: &mut Vec<ClassificationCandidate>,
    ) {
        for rule in rules.iter().filter(|r| r.matches(tokens)) {
            for (rank, (code, description)) in rule.codes.iter().enumerate() {
                if out.len() >= self.config.max_candidates {
                    return;
                }
                let confidence =
                    f64::from(start) - rank as f64 * f64::from(self.config.decrement);
                if let Some(candidate) = ClassificationCandidate::new(
                    code,
                    *description,
                    confidence,
                    SourceTier::Algorithmic,
                ) {
                    out.push(candidate.with_category(rule.name));
                }
            }
        }
    }
}

#[async_trait]
impl ClassificationStrategy for AlgorithmicStrategy {
    fn name(&self) -> &'static str {
        "algorithmic"
    }

    fn tier(&self) -> SourceTier {
        SourceTier::Algorithmic
    }

    async fn classify(
        &self,
        ctx: &ClassificationContext,
    ) -> Result<Vec<ClassificationCandidate>, StrategyError> {
        Ok(self.generate(&ctx.request.description))
    }
}
