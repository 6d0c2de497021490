//! Tier 1 corpus search strategy

use super::relevance::{score_entry, score_to_confidence, EntryOrigin};
use crate::config::CorpusSearchConfig;
use crate::corpus::{CorpusError, ReferenceCorpus};
use crate::engine::category_mapper::CategoryMatch;
use crate::engine::{ClassificationContext, ClassificationStrategy, StrategyError};
use crate::events::ClassificationEvent;
use crate::types::{ClassificationCandidate, ReferenceEntry, SourceTier};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// One independent corpus lookup
#[derive(Debug, Clone)]
enum Lookup {
    Premium,
    Category(CategoryMatch),
    Term(String),
}

impl Lookup {
    fn label(&self) -> String {
        match self {
            Self::Premium => "premium".to_string(),
            Self::Category(c) => format!("category:{}", c.name),
            Self::Term(t) => format!("term:{}", t),
        }
    }

    fn origin(&self) -> EntryOrigin {
        match self {
            Self::Premium => EntryOrigin::Premium,
            Self::Category(c) => EntryOrigin::Category {
                confidence: c.base_confidence,
            },
            Self::Term(_) => EntryOrigin::Term,
        }
    }
}

/// Tier 1: search the reference corpus
///
/// Issues the premium-subset lookup, one lookup per top category and one per
/// top term concurrently. Each lookup is bounded by the configured timeout;
/// a failed or timed-out lookup contributes nothing and never aborts the tier.
///
/// # Example
/// ```rust,ignore
/// let tier1 = CorpusSearchStrategy::new(corpus, CorpusSearchConfig::default());
/// let candidates = tier1.classify(&ctx).await?;
/// ```
pub struct CorpusSearchStrategy {
    corpus: Arc<dyn ReferenceCorpus>,
    config: CorpusSearchConfig,
}

impl CorpusSearchStrategy {
    pub fn new(corpus: Arc<dyn ReferenceCorpus>, config: CorpusSearchConfig) -> Self {
        Self { corpus, config }
    }

    fn plan_lookups(&self, ctx: &ClassificationContext) -> Vec<Lookup> {
        let mut lookups = Vec::new();
        if !ctx.terms.is_empty() && self.config.premium_limit > 0 {
            lookups.push(Lookup::Premium);
        }
        lookups.extend(
            ctx.categories
                .iter()
                .take(self.config.max_categories)
                .cloned()
                .map(Lookup::Category),
        );
        lookups.extend(
            ctx.terms
                .iter()
                .take(self.config.term_lookups)
                .cloned()
                .map(Lookup::Term),
        );
        lookups
    }

    async fn query(&self, lookup: &Lookup) -> Result<Vec<ReferenceEntry>, CorpusError> {
        match lookup {
            Lookup::Premium => {
                self.corpus
                    .search_premium_subset(self.config.premium_limit)
                    .await
            }
            Lookup::Category(c) => {
                self.corpus
                    .search_by_category(&c.code_range_start, &c.code_range_end, self.config.page_size)
                    .await
            }
            Lookup::Term(t) => self.corpus.search_by_term(t, self.config.page_size).await,
        }
    }

    /// Run one lookup under the timeout, degrading failures to no entries
    async fn run_lookup(
        &self,
        ctx: &ClassificationContext,
        lookup: Lookup,
    ) -> (Lookup, Vec<ReferenceEntry>) {
        let outcome = match tokio::time::timeout(self.config.lookup_timeout(), self.query(&lookup)).await
        {
            Ok(result) => result,
            Err(_) => Err(CorpusError::Timeout(self.config.lookup_timeout_ms)),
        };

        match outcome {
            Ok(entries) => {
                debug!(
                    request_id = %ctx.request_id,
                    lookup = %lookup.label(),
                    entries = entries.len(),
                    "Corpus lookup complete"
                );
                (lookup, entries)
            }
            Err(e) => {
                warn!(
                    request_id = %ctx.request_id,
                    lookup = %lookup.label(),
                    error = %e,
                    "Corpus lookup failed (treated as no entries)"
                );
                ctx.events.emit(ClassificationEvent::LookupFailed {
                    request_id: ctx.request_id,
                    lookup: lookup.label(),
                    error: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                (lookup, Vec::new())
            }
        }
    }

    fn score(
        &self,
        ctx: &ClassificationContext,
        lookup: &Lookup,
        entry: &ReferenceEntry,
    ) -> Option<ClassificationCandidate> {
        let score = score_entry(
            entry,
            &ctx.request.description,
            &ctx.terms,
            &ctx.categories,
            lookup.origin(),
            &self.config.weights,
        );

        // A category reached through description keywords vouches for its
        // entries; a hint-only category does not
        let evidence = match lookup {
            Lookup::Category(c) if !c.matched_terms.is_empty() => true,
            _ => score.has_textual_evidence(),
        };
        let total = score.total();
        if !evidence || total <= 0.0 {
            return None;
        }

        let confidence = score_to_confidence(
            total,
            self.config.confidence_floor,
            self.config.confidence_ceiling,
        );
        let category = entry.category.clone().or_else(|| match lookup {
            Lookup::Category(c) => Some(c.name.clone()),
            _ => None,
        });

        let Some(mut candidate) = ClassificationCandidate::new(
            &entry.code,
            entry.description.clone(),
            f64::from(confidence),
            SourceTier::Corpus,
        ) else {
            debug!(code = %entry.code, "Skipping corpus entry without a numeric code");
            return None;
        };
        candidate.category = category;
        candidate.matched_terms = score.matched_terms;
        Some(candidate)
    }
}

#[async_trait]
impl ClassificationStrategy for CorpusSearchStrategy {
    fn name(&self) -> &'static str {
        "corpus_search"
    }

    fn tier(&self) -> SourceTier {
        SourceTier::Corpus
    }

    async fn classify(
        &self,
        ctx: &ClassificationContext,
    ) -> Result<Vec<ClassificationCandidate>, StrategyError> {
        let lookups = self.plan_lookups(ctx);
        if lookups.is_empty() {
            debug!(request_id = %ctx.request_id, "Nothing to look up in corpus");
            return Ok(Vec::new());
        }

        let results = join_all(lookups.into_iter().map(|l| self.run_lookup(ctx, l))).await;

        let candidates: Vec<ClassificationCandidate> = results
            .iter()
            .flat_map(|(lookup, entries)| {
                entries
                    .iter()
                    .filter_map(move |entry| self.score(ctx, lookup, entry))
            })
            .collect();

        debug!(
            request_id = %ctx.request_id,
            candidates = candidates.len(),
            "Corpus search scored entries"
        );
        Ok(candidates)
    }
}
