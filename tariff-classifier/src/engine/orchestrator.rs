//! Classification Orchestrator
//!
//! Runs the tiers strictly in sequence and stops at the first tier that
//! produces at least one candidate.
//!
//! ```text
//! START ─ empty description ─────────────────────────────► TIER 3 (hint / manual review)
//! START ─► TIER 1 ─ empty ─► TIER 2 ─ empty ─► TIER 3 ─► TERMINAL
//!            └ sufficient ─► TERMINAL_CORPUS
//!                              └ sufficient ─► TERMINAL_ALGORITHMIC
//! ```
//!
//! **Error isolation:** a tier error is logged, reported on the event channel
//! and treated as "zero candidates". Classification itself never fails for a
//! well-formed request; the worst case is a single manual review candidate.

use super::ranker::rank_and_dedupe;
use super::tier1::CorpusSearchStrategy;
use super::tier2::AlgorithmicStrategy;
use super::tier3::StaticPatternStrategy;
use super::{ClassificationContext, ClassificationStrategy};
use crate::config::ClassifierConfig;
use crate::corpus::ReferenceCorpus;
use crate::events::{ClassificationEvent, EventEmitter};
use crate::types::{
    ClassificationCandidate, ClassificationRequest, ClassificationResult, ClassifierResult,
    SourceTier,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Product classification engine
///
/// Holds no per-request state; share it behind an `Arc` and call it from
/// as many tasks as needed.
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
/// use tariff_classifier::{ClassificationEngine, ClassifierConfig, InMemoryCorpus};
///
/// let engine = ClassificationEngine::new(Arc::new(InMemoryCorpus::empty()), ClassifierConfig::default())?;
/// let result = engine.classify("stainless steel bracket", Some("Manufacturing")).await;
/// println!("{:?}", result.best_match);
/// ```
pub struct ClassificationEngine {
    /// Tiers in execution order
    strategies: Vec<Arc<dyn ClassificationStrategy>>,
    config: ClassifierConfig,
    events: EventEmitter,
}

impl ClassificationEngine {
    /// Standard three-tier engine over the given corpus
    pub fn new(corpus: Arc<dyn ReferenceCorpus>, config: ClassifierConfig) -> ClassifierResult<Self> {
        let strategies: Vec<Arc<dyn ClassificationStrategy>> = vec![
            Arc::new(CorpusSearchStrategy::new(corpus, config.corpus_search.clone())),
            Arc::new(AlgorithmicStrategy::new(config.algorithmic.clone())),
            Arc::new(StaticPatternStrategy::new(config.static_patterns.clone())),
        ];
        Self::with_strategies(strategies, config)
    }

    /// Engine over a custom tier list (run in the given order)
    pub fn with_strategies(
        strategies: Vec<Arc<dyn ClassificationStrategy>>,
        config: ClassifierConfig,
    ) -> ClassifierResult<Self> {
        config.validate()?;
        info!(
            tiers = ?strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            result_limit = config.result_limit,
            "Classification engine initialized"
        );
        Ok(Self {
            strategies,
            config,
            events: EventEmitter::disabled(),
        })
    }

    /// Attach an event emitter
    pub fn with_events(mut self, events: EventEmitter) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a description with an optional industry hint
    pub async fn classify(&self, description: &str, industry_hint: Option<&str>) -> ClassificationResult {
        self.classify_request(&ClassificationRequest::new(description, industry_hint))
            .await
    }

    /// Classify untyped JSON input
    ///
    /// # Errors
    /// `ClassifierError::InvalidInput` if the request shape is invalid. This is
    /// the only error classification can return.
    pub async fn classify_json(&self, value: &serde_json::Value) -> ClassifierResult<ClassificationResult> {
        let request = ClassificationRequest::from_json(value)?;
        Ok(self.classify_request(&request).await)
    }

    /// Classify unless the caller cancels first
    ///
    /// In-flight corpus lookups are dropped on cancellation; the engine holds
    /// nothing that needs rolling back.
    pub async fn classify_cancellable(
        &self,
        request: &ClassificationRequest,
        cancel: CancellationToken,
    ) -> Option<ClassificationResult> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Classification cancelled by caller");
                None
            }
            result = self.classify_request(request) => Some(result),
        }
    }

    /// Run the tier pipeline for one request
    pub async fn classify_request(&self, request: &ClassificationRequest) -> ClassificationResult {
        let start_time = Instant::now();

        // Phase 1: Term extraction and category mapping
        let ctx = ClassificationContext::prepare(request, self.events.clone());
        let request_id = ctx.request_id;

        info!(
            %request_id,
            terms = ctx.terms.len(),
            categories = ctx.categories.len(),
            hint = request.hint().unwrap_or("-"),
            "Classification started"
        );
        self.events.emit(ClassificationEvent::ClassificationStarted {
            request_id,
            term_count: ctx.terms.len(),
            category_count: ctx.categories.len(),
            has_hint: request.hint().is_some(),
            timestamp: Utc::now(),
        });

        // Phase 2: Select tiers (empty input goes straight to the static table)
        let stages: Vec<&Arc<dyn ClassificationStrategy>> = if request.is_empty_input() {
            debug!(%request_id, "Empty description, skipping to static fallback");
            self.events.emit(ClassificationEvent::FallbackTriggered {
                request_id,
                from_tier: None,
                reason: "empty description".to_string(),
                timestamp: Utc::now(),
            });
            self.strategies
                .iter()
                .filter(|s| s.tier() == SourceTier::Static)
                .collect()
        } else {
            self.strategies.iter().collect()
        };

        // Phase 3: Run tiers until one is sufficient
        let mut produced = Vec::new();
        for (index, strategy) in stages.iter().enumerate() {
            let tier = strategy.tier();
            let tier_start = Instant::now();
            self.events.emit(ClassificationEvent::TierStarted {
                request_id,
                tier,
                timestamp: Utc::now(),
            });

            match strategy.classify(&ctx).await {
                Ok(candidates) => {
                    let duration_ms = tier_start.elapsed().as_millis() as u64;
                    debug!(
                        %request_id,
                        tier = %tier,
                        strategy = strategy.name(),
                        candidates = candidates.len(),
                        duration_ms,
                        "Tier complete"
                    );
                    self.events.emit(ClassificationEvent::TierCompleted {
                        request_id,
                        tier,
                        candidate_count: candidates.len(),
                        duration_ms,
                        timestamp: Utc::now(),
                    });

                    if !candidates.is_empty() {
                        let skipped_tiers = stages.len() - index - 1;
                        if skipped_tiers > 0 {
                            self.events.emit(ClassificationEvent::ShortCircuit {
                                request_id,
                                tier,
                                skipped_tiers,
                                timestamp: Utc::now(),
                            });
                        }
                        produced = candidates;
                        break;
                    }

                    self.events.emit(ClassificationEvent::FallbackTriggered {
                        request_id,
                        from_tier: Some(tier),
                        reason: "no candidates".to_string(),
                        timestamp: Utc::now(),
                    });
                }
                Err(e) => {
                    warn!(
                        %request_id,
                        tier = %tier,
                        strategy = strategy.name(),
                        error = %e,
                        "Tier failed (treated as no candidates)"
                    );
                    self.events.emit(ClassificationEvent::TierFailed {
                        request_id,
                        tier,
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    self.events.emit(ClassificationEvent::FallbackTriggered {
                        request_id,
                        from_tier: Some(tier),
                        reason: "tier failed".to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        if produced.is_empty() {
            warn!(%request_id, "No tier produced candidates, manual review required");
            produced.push(ClassificationCandidate::manual_review(
                self.config.static_patterns.manual_review_confidence,
            ));
        }

        // Phase 4: Dedupe, order, truncate
        let candidates = rank_and_dedupe(produced, self.config.result_limit);
        let best_match = candidates.first().cloned();
        let resolved_by = best_match
            .as_ref()
            .map_or(SourceTier::ManualReview, |c| c.source_tier);
        let duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            %request_id,
            resolved_by = %resolved_by,
            candidates = candidates.len(),
            best = best_match.as_ref().map(|c| c.code.as_str()).unwrap_or("-"),
            duration_ms,
            "Classification complete"
        );
        self.events.emit(ClassificationEvent::ClassificationCompleted {
            request_id,
            resolved_by,
            candidate_count: candidates.len(),
            best_code: best_match.as_ref().map(|c| c.code.clone()),
            duration_ms,
            timestamp: Utc::now(),
        });

        ClassificationResult {
            request_id,
            candidates,
            best_match,
            resolved_by,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StrategyError;
    use crate::types::ClassifierError;
    use async_trait::async_trait;

    struct FixedStrategy {
        tier: SourceTier,
        codes: Vec<(&'static str, f64)>,
        fail: bool,
    }

    #[async_trait]
    impl ClassificationStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn tier(&self) -> SourceTier {
            self.tier
        }

        async fn classify(
            &self,
            _ctx: &ClassificationContext,
        ) -> Result<Vec<ClassificationCandidate>, StrategyError> {
            if self.fail {
                return Err(StrategyError::Internal("boom".to_string()));
            }
            Ok(self
                .codes
                .iter()
                .filter_map(|(code, conf)| ClassificationCandidate::new(code, "fixed", *conf, self.tier))
                .collect())
        }
    }

    fn fixed(tier: SourceTier, codes: Vec<(&'static str, f64)>) -> Arc<dyn ClassificationStrategy> {
        Arc::new(FixedStrategy {
            tier,
            codes,
            fail: false,
        })
    }

    fn failing(tier: SourceTier) -> Arc<dyn ClassificationStrategy> {
        Arc::new(FixedStrategy {
            tier,
            codes: Vec::new(),
            fail: true,
        })
    }

    #[tokio::test]
    async fn test_failed_tier_falls_through() {
        let engine = ClassificationEngine::with_strategies(
            vec![
                failing(SourceTier::Corpus),
                fixed(SourceTier::Algorithmic, vec![("7208", 75.0)]),
            ],
            ClassifierConfig::default(),
        )
        .unwrap();

        let result = engine.classify("steel bracket", None).await;
        assert_eq!(result.resolved_by, SourceTier::Algorithmic);
        assert_eq!(result.candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_all_tiers_empty_yields_manual_review() {
        let engine = ClassificationEngine::with_strategies(
            vec![fixed(SourceTier::Corpus, vec![]), failing(SourceTier::Static)],
            ClassifierConfig::default(),
        )
        .unwrap();

        let result = engine.classify("anything", None).await;
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.resolved_by, SourceTier::ManualReview);
        assert_eq!(result.best_match.unwrap().confidence, 30);
    }

    #[tokio::test]
    async fn test_result_is_ranked_and_limited() {
        let engine = ClassificationEngine::with_strategies(
            vec![fixed(
                SourceTier::Corpus,
                vec![("1111", 61.0), ("2222", 90.0), ("1111", 88.0), ("3333", 70.0), ("4444", 65.0)],
            )],
            ClassifierConfig::default(),
        )
        .unwrap();

        let result = engine.classify("whatever", None).await;
        let codes: Vec<&str> = result.candidates.iter().map(|c| c.raw_code.as_str()).collect();
        assert_eq!(codes, vec!["2222", "1111", "3333"]);
        assert_eq!(result.best_match.as_ref(), result.candidates.first());
    }

    #[tokio::test]
    async fn test_events_follow_tier_sequence() {
        let (emitter, mut rx) = EventEmitter::channel(32);
        let engine = ClassificationEngine::with_strategies(
            vec![
                fixed(SourceTier::Corpus, vec![]),
                fixed(SourceTier::Algorithmic, vec![("7208", 75.0)]),
                fixed(SourceTier::Static, vec![("9999", 65.0)]),
            ],
            ClassifierConfig::default(),
        )
        .unwrap()
        .with_events(emitter);

        let result = engine.classify("steel", None).await;

        let mut types = Vec::new();
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.request_id(), result.request_id);
            types.push(event.event_type());
        }
        assert_eq!(
            types,
            vec![
                "classification_started",
                "tier_started",
                "tier_completed",
                "fallback_triggered",
                "tier_started",
                "tier_completed",
                "short_circuit",
                "classification_completed",
            ]
        );
    }

    #[tokio::test]
    async fn test_classify_json_rejects_bad_shape() {
        let engine = ClassificationEngine::new(
            Arc::new(crate::corpus::InMemoryCorpus::empty()),
            ClassifierConfig::default(),
        )
        .unwrap();

        let err = engine
            .classify_json(&serde_json::json!({ "description": ["steel"] }))
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = ClassifierConfig::default();
        config.result_limit = 0;
        let result = ClassificationEngine::with_strategies(Vec::new(), config);
        assert!(matches!(result, Err(ClassifierError::Config(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let engine = ClassificationEngine::new(
            Arc::new(crate::corpus::InMemoryCorpus::empty()),
            ClassifierConfig::default(),
        )
        .unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let request = ClassificationRequest::new("steel bracket", None);
        assert!(engine.classify_cancellable(&request, token).await.is_none());
    }
}
