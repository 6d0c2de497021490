//! Core types and data contracts for the classification engine
//!
//! Defines the explicit contracts flowing between the tiers:
//! - **Input:** `ClassificationRequest` (free-text description + optional industry hint)
//! - **Per-tier output:** `ClassificationCandidate`, tagged with its `SourceTier`
//! - **Final output:** `ClassificationResult` (ranked shortlist + best match)
//! - **Corpus contract:** `ReferenceEntry`, owned by the reference corpus

use crate::engine::formatter::{digits_only, format_code};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Source Tier
// ============================================================================

/// Strategy that produced a candidate
///
/// Ordered by trust: corpus matches are preferred over generated codes, which
/// are preferred over the static safety net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceTier {
    /// Tier 1: reference corpus search
    Corpus,
    /// Tier 2: material/function rule generator
    Algorithmic,
    /// Tier 3: static keyword table
    Static,
    /// Terminal state: nothing matched
    ManualReview,
}

impl SourceTier {
    /// Tie-break priority (higher wins)
    pub fn priority(self) -> u8 {
        match self {
            Self::Corpus => 3,
            Self::Algorithmic => 2,
            Self::Static => 1,
            Self::ManualReview => 0,
        }
    }

    /// Human-readable label for presentation layers
    pub fn label(self) -> &'static str {
        match self {
            Self::Corpus => "Reference corpus match",
            Self::Algorithmic => "Rule-based estimate",
            Self::Static => "Common product pattern",
            Self::ManualReview => "Manual review required",
        }
    }
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Corpus => "CORPUS",
            Self::Algorithmic => "ALGORITHMIC",
            Self::Static => "STATIC",
            Self::ManualReview => "MANUAL_REVIEW",
        };
        f.write_str(name)
    }
}

/// Round and clamp a heuristic score into the 0-100 confidence range
///
/// NaN and negative arithmetic both floor at 0.
pub fn clamp_confidence(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

// ============================================================================
// Request
// ============================================================================

/// Classification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// Free-text product description (may be empty)
    pub description: String,
    /// Optional industry label, e.g. "Electronics"
    #[serde(default)]
    pub industry_hint: Option<String>,
}

impl ClassificationRequest {
    pub fn new(description: impl Into<String>, industry_hint: Option<&str>) -> Self {
        Self {
            description: description.into(),
            industry_hint: industry_hint.map(str::to_string),
        }
    }

    /// True when there is nothing to search on
    pub fn is_empty_input(&self) -> bool {
        self.description.trim().is_empty()
    }

    /// Trimmed, non-empty industry hint
    pub fn hint(&self) -> Option<&str> {
        self.industry_hint
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }

    /// Build a request from untyped JSON input
    ///
    /// `description` must be present and a string; `industry_hint` may be
    /// absent or null, otherwise it must be a string.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ClassifierError> {
        let object = value.as_object().ok_or_else(|| {
            ClassifierError::InvalidInput("request must be a JSON object".to_string())
        })?;

        let description = match object.get("description") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(ClassifierError::InvalidInput(format!(
                    "description must be a string, got {}",
                    json_type_name(other)
                )))
            }
            None => {
                return Err(ClassifierError::InvalidInput(
                    "description is required".to_string(),
                ))
            }
        };

        let industry_hint = match object.get("industry_hint") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(ClassifierError::InvalidInput(format!(
                    "industry_hint must be a string, got {}",
                    json_type_name(other)
                )))
            }
        };

        Ok(Self {
            description,
            industry_hint,
        })
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ============================================================================
// Candidate
// ============================================================================

/// Raw code used for the manual review sentinel
pub const MANUAL_REVIEW_RAW_CODE: &str = "000000";

/// A single classification candidate
///
/// `code` is always derived from `raw_code` through `format_code`, so the two
/// can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCandidate {
    /// Canonical dotted code, e.g. "8413.70"
    pub code: String,
    /// Unformatted digit string, e.g. "841370"
    pub raw_code: String,
    /// Human-readable label for the code
    pub description: String,
    /// Heuristic confidence (0-100)
    pub confidence: u8,
    /// Strategy that produced the candidate
    pub source_tier: SourceTier,
    /// Category name, if known
    pub category: Option<String>,
    /// Terms that contributed to the match
    pub matched_terms: Vec<String>,
}

impl ClassificationCandidate {
    /// Create a candidate from a raw code
    ///
    /// Non-digit characters are stripped from `raw_code`. Returns `None` if no
    /// digits remain.
    pub fn new(
        raw_code: &str,
        description: impl Into<String>,
        confidence: f64,
        source_tier: SourceTier,
    ) -> Option<Self> {
        let raw = digits_only(raw_code);
        if raw.is_empty() {
            return None;
        }

        Some(Self {
            code: format_code(&raw),
            raw_code: raw,
            description: description.into(),
            confidence: clamp_confidence(confidence),
            source_tier,
            category: None,
            matched_terms: Vec::new(),
        })
    }

    /// Terminal candidate emitted when no strategy produced anything
    pub fn manual_review(confidence: u8) -> Self {
        Self {
            code: format_code(MANUAL_REVIEW_RAW_CODE),
            raw_code: MANUAL_REVIEW_RAW_CODE.to_string(),
            description: "Manual classification required".to_string(),
            confidence: confidence.min(100),
            source_tier: SourceTier::ManualReview,
            category: None,
            matched_terms: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_matched_terms(mut self, terms: Vec<String>) -> Self {
        self.matched_terms = terms;
        self
    }
}

// ============================================================================
// Corpus entry
// ============================================================================

/// Reference entry returned by the corpus (read-only to the engine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl ReferenceEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

// ============================================================================
// Result
// ============================================================================

/// Final classification output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Correlates log lines and events for this request
    pub request_id: Uuid,
    /// Ranked shortlist, never empty
    pub candidates: Vec<ClassificationCandidate>,
    /// Highest-ranked candidate
    pub best_match: Option<ClassificationCandidate>,
    /// Tier that terminated the fallback chain
    pub resolved_by: SourceTier,
    /// Wall-clock time spent classifying
    pub duration_ms: u64,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors crossing the engine boundary
///
/// Only `InvalidInput` is ever returned by classification itself; the other
/// variants come from construction and configuration.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Malformed request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference corpus failure
    #[error("Corpus error: {0}")]
    Corpus(#[from] crate::corpus::CorpusError),

    /// Shared library error
    #[error(transparent)]
    Common(#[from] tariff_common::Error),
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;

// ============================================================================
// Tests
// ============================================================================
