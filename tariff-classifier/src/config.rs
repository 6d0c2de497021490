//! Classifier configuration
//!
//! Every heuristic constant of the engine lives here so it can be
//! recalibrated from TOML without code changes. All fields have defaults;
//! an empty file (or no file) yields the stock engine.
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [corpus]
//! path = "/var/lib/tariff/reference.db"
//!
//! [classifier]
//! result_limit = 3
//!
//! [classifier.corpus_search]
//! lookup_timeout_ms = 1500
//! ```
//!
//! **Priority:** CLI → ENV (`TARIFF_CORPUS_PATH`, `TARIFF_LOG_LEVEL`) → TOML → defaults

use crate::types::{ClassifierError, ClassifierResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tariff_common::config::{env_override, load_or_default, resolve_config_path};
use tariff_common::logging::LoggingConfig;

/// Environment variable overriding the corpus path
pub const CORPUS_PATH_ENV_VAR: &str = "TARIFF_CORPUS_PATH";

/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV_VAR: &str = "TARIFF_LOG_LEVEL";

/// Static-tier confidence must stay below the other tiers' typical output
pub const MAX_STATIC_CONFIDENCE: u8 = 70;

/// Ceiling for the hint and manual-review fallbacks, which answer empty input
pub const MAX_FALLBACK_CONFIDENCE: u8 = 50;

// ============================================================================
// Engine configuration
// ============================================================================

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub corpus_search: CorpusSearchConfig,
    pub algorithmic: AlgorithmicConfig,
    pub static_patterns: StaticPatternConfig,
    /// Maximum candidates in the final result
    pub result_limit: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            corpus_search: CorpusSearchConfig::default(),
            algorithmic: AlgorithmicConfig::default(),
            static_patterns: StaticPatternConfig::default(),
            result_limit: 3,
        }
    }
}

/// Tier 1 (corpus search) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSearchConfig {
    /// Categories swept per request
    pub max_categories: usize,
    /// Extracted terms looked up directly
    pub term_lookups: usize,
    /// Entries requested per category/term lookup
    pub page_size: usize,
    /// Entries requested from the premium subset
    pub premium_limit: usize,
    /// Per-lookup timeout
    pub lookup_timeout_ms: u64,
    pub confidence_floor: u8,
    pub confidence_ceiling: u8,
    pub weights: RelevanceWeights,
}

impl Default for CorpusSearchConfig {
    fn default() -> Self {
        Self {
            max_categories: 3,
            term_lookups: 2,
            page_size: 25,
            premium_limit: 50,
            lookup_timeout_ms: 2000,
            confidence_floor: 60,
            confidence_ceiling: 98,
            weights: RelevanceWeights::default(),
        }
    }
}

impl CorpusSearchConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// Relevance scoring weights (score points, 0-100 scale)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceWeights {
    /// Request text contained in entry text (or vice versa)
    pub containment: f64,
    /// Multiplied by the Jaccard token overlap
    pub overlap: f64,
    /// Per extra occurrence of the dominant term
    pub repeat_per_occurrence: f64,
    pub repeat_cap: f64,
    /// Entry heading inside a hint-selected category
    pub industry_alignment: f64,
    /// Multiplied by the originating category's confidence
    pub category_origin: f64,
    /// Entry came from the premium subset
    pub premium: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            containment: 40.0,
            overlap: 35.0,
            repeat_per_occurrence: 5.0,
            repeat_cap: 15.0,
            industry_alignment: 15.0,
            category_origin: 0.25,
            premium: 10.0,
        }
    }
}

/// Tier 2 (rule generator) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmicConfig {
    pub material_start: u8,
    pub function_start: u8,
    /// Confidence lost per rank within a rule
    pub decrement: u8,
    pub max_candidates: usize,
}

impl Default for AlgorithmicConfig {
    fn default() -> Self {
        Self {
            material_start: 75,
            function_start: 70,
            decrement: 5,
            max_candidates: 5,
        }
    }
}

/// Tier 3 (static table) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticPatternConfig {
    pub static_confidence: u8,
    pub hint_confidence: u8,
    pub manual_review_confidence: u8,
}

impl Default for StaticPatternConfig {
    fn default() -> Self {
        Self {
            static_confidence: 65,
            hint_confidence: 50,
            manual_review_confidence: 30,
        }
    }
}

impl ClassifierConfig {
    /// Reject configurations the engine cannot honor
    pub fn validate(&self) -> ClassifierResult<()> {
        let search = &self.corpus_search;
        if search.confidence_floor >= search.confidence_ceiling {
            return Err(ClassifierError::Config(format!(
                "corpus_search.confidence_floor ({}) must be below confidence_ceiling ({})",
                search.confidence_floor, search.confidence_ceiling
            )));
        }
        if search.confidence_ceiling > 100 {
            return Err(ClassifierError::Config(format!(
                "corpus_search.confidence_ceiling ({}) exceeds 100",
                search.confidence_ceiling
            )));
        }
        if search.page_size == 0 || search.lookup_timeout_ms == 0 {
            return Err(ClassifierError::Config(
                "corpus_search.page_size and lookup_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.algorithmic.max_candidates == 0 {
            return Err(ClassifierError::Config(
                "algorithmic.max_candidates must be non-zero".to_string(),
            ));
        }
        if self.result_limit == 0 {
            return Err(ClassifierError::Config(
                "result_limit must be non-zero".to_string(),
            ));
        }

        let statics = &self.static_patterns;
        if statics.static_confidence > MAX_STATIC_CONFIDENCE {
            return Err(ClassifierError::Config(format!(
                "static_patterns.static_confidence ({}) exceeds {}",
                statics.static_confidence, MAX_STATIC_CONFIDENCE
            )));
        }
        if statics.hint_confidence > MAX_FALLBACK_CONFIDENCE
            || statics.manual_review_confidence > MAX_FALLBACK_CONFIDENCE
        {
            return Err(ClassifierError::Config(format!(
                "static_patterns.hint_confidence and manual_review_confidence must not exceed {}",
                MAX_FALLBACK_CONFIDENCE
            )));
        }
        if statics.hint_confidence > statics.static_confidence
            || statics.manual_review_confidence > statics.hint_confidence
        {
            return Err(ClassifierError::Config(
                "static_patterns confidences must satisfy manual_review <= hint <= static"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Service configuration (CLI binary)
// ============================================================================

/// Reference corpus location
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorpusConfig {
    /// JSON file or SQLite database; None runs without a corpus
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Full TOML file layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

impl ServiceConfig {
    /// Resolve, load and validate configuration
    ///
    /// A missing file degrades to defaults; a malformed file or an invalid
    /// engine configuration is an error.
    pub fn load(cli_config: Option<&Path>) -> ClassifierResult<Self> {
        let path = resolve_config_path(cli_config);
        let mut config: ServiceConfig = load_or_default(path.as_deref())?;
        config.apply_env_overrides();
        config.classifier.validate()?;
        config.logging.validate()?;
        Ok(config)
    }

    /// Apply `TARIFF_CORPUS_PATH` and `TARIFF_LOG_LEVEL`
    pub fn apply_env_overrides(&mut self) {
        if let Some(path) = env_override(CORPUS_PATH_ENV_VAR) {
            tracing::debug!("Corpus path overridden by {}", CORPUS_PATH_ENV_VAR);
            self.corpus.path = Some(PathBuf::from(path));
        }
        if let Some(level) = env_override(LOG_LEVEL_ENV_VAR) {
            self.logging.level = level;
        }
    }
}
