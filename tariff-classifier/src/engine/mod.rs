//! Product Classification Engine
//!
//! # Architecture
//! Three strategies run strictly in sequence, each invoked only when the
//! previous one produced nothing:
//! - **Tier 1:** Corpus search (premium subset, category sweep, term lookups)
//! - **Tier 2:** Algorithmic generator (material and function rules)
//! - **Tier 3:** Static pattern table (always produces a candidate)
//!
//! Shared stages around the tiers:
//! - `term_extractor` / `category_mapper` prepare the `ClassificationContext`
//! - `ranker` dedupes and orders the winning tier's candidates
//! - `formatter` renders canonical dotted codes

pub mod category_mapper;
pub mod formatter;
pub mod orchestrator;
pub mod ranker;
pub mod term_extractor;
pub mod tier1;
pub mod tier2;
pub mod tier3;

pub use category_mapper::{map_to_categories, CategoryMatch};
pub use formatter::format_code;
pub use orchestrator::ClassificationEngine;
pub use ranker::rank_and_dedupe;
pub use term_extractor::extract_terms;

use crate::events::EventEmitter;
use crate::types::{ClassificationCandidate, ClassificationRequest, SourceTier};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Everything a strategy may look at for one request
#[derive(Debug, Clone)]
pub struct ClassificationContext {
    pub request_id: Uuid,
    pub request: ClassificationRequest,
    /// Ranked terms from `extract_terms`
    pub terms: Vec<String>,
    /// Categories from `map_to_categories`, best first
    pub categories: Vec<CategoryMatch>,
    pub events: EventEmitter,
}

impl ClassificationContext {
    /// Run term extraction and category mapping for a request
    pub fn prepare(request: &ClassificationRequest, events: EventEmitter) -> Self {
        let terms = extract_terms(&request.description);
        let categories = map_to_categories(&terms, request.hint());
        Self {
            request_id: Uuid::new_v4(),
            request: request.clone(),
            terms,
            categories,
            events,
        }
    }
}

/// Error raised at a tier boundary
///
/// Never reaches the caller: the orchestrator logs it and moves to the next tier.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Corpus error: {0}")]
    Corpus(#[from] crate::corpus::CorpusError),

    #[error("Strategy failed: {0}")]
    Internal(String),
}

/// A classification tier
#[async_trait]
pub trait ClassificationStrategy: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &'static str;

    /// Tier tag applied to this strategy's candidates
    fn tier(&self) -> SourceTier;

    /// Produce candidates for the request (empty means "not sufficient")
    async fn classify(
        &self,
        ctx: &ClassificationContext,
    ) -> Result<Vec<ClassificationCandidate>, StrategyError>;
}
