//! Stub corpora and instrumented strategies

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tariff_classifier::corpus::{CorpusError, ReferenceCorpus};
use tariff_classifier::engine::{ClassificationContext, ClassificationStrategy, StrategyError};
use tariff_classifier::types::{ClassificationCandidate, ReferenceEntry, SourceTier};

// ============================================================================
// Failing corpus
// ============================================================================

/// Corpus whose every lookup fails as unavailable
#[derive(Debug, Default)]
pub struct FailingCorpus;

#[async_trait]
impl ReferenceCorpus for FailingCorpus {
    async fn search_by_category(
        &self,
        _start: &str,
        _end: &str,
        _limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        Err(CorpusError::Unavailable("stub: corpus offline".to_string()))
    }

    async fn search_by_term(
        &self,
        _term: &str,
        _limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        Err(CorpusError::Unavailable("stub: corpus offline".to_string()))
    }

    async fn search_premium_subset(
        &self,
        _limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        Err(CorpusError::Unavailable("stub: corpus offline".to_string()))
    }
}

// ============================================================================
// Slow corpus
// ============================================================================

/// Corpus that sleeps before answering from an inner corpus
///
/// Pair with `#[tokio::test(start_paused = true)]` so delays cost no wall time.
pub struct SlowCorpus {
    inner: Arc<dyn ReferenceCorpus>,
    delay: Duration,
}

impl SlowCorpus {
    pub fn new(inner: Arc<dyn ReferenceCorpus>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl ReferenceCorpus for SlowCorpus {
    async fn search_by_category(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        tokio::time::sleep(self.delay).await;
        self.inner.search_by_category(start, end, limit).await
    }

    async fn search_by_term(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        tokio::time::sleep(self.delay).await;
        self.inner.search_by_term(term, limit).await
    }

    async fn search_premium_subset(
        &self,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        tokio::time::sleep(self.delay).await;
        self.inner.search_premium_subset(limit).await
    }
}

// ============================================================================
// Counting corpus
// ============================================================================

/// Corpus wrapper counting calls per lookup kind
pub struct CountingCorpus {
    inner: Arc<dyn ReferenceCorpus>,
    pub category_calls: AtomicUsize,
    pub term_calls: AtomicUsize,
    pub premium_calls: AtomicUsize,
}

impl CountingCorpus {
    pub fn new(inner: Arc<dyn ReferenceCorpus>) -> Self {
        Self {
            inner,
            category_calls: AtomicUsize::new(0),
            term_calls: AtomicUsize::new(0),
            premium_calls: AtomicUsize::new(0),
        }
    }

    pub fn total_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
            + self.term_calls.load(Ordering::SeqCst)
            + self.premium_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceCorpus for CountingCorpus {
    async fn search_by_category(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search_by_category(start, end, limit).await
    }

    async fn search_by_term(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        self.term_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search_by_term(term, limit).await
    }

    async fn search_premium_subset(
        &self,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        self.premium_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search_premium_subset(limit).await
    }
}

// ============================================================================
// Counting strategy
// ============================================================================

/// Strategy wrapper counting invocations
pub struct CountingStrategy {
    inner: Arc<dyn ClassificationStrategy>,
    calls: AtomicUsize,
}

impl CountingStrategy {
    pub fn new(inner: Arc<dyn ClassificationStrategy>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationStrategy for CountingStrategy {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn tier(&self) -> SourceTier {
        self.inner.tier()
    }

    async fn classify(
        &self,
        ctx: &ClassificationContext,
    ) -> Result<Vec<ClassificationCandidate>, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.classify(ctx).await
    }
}
