//! In-memory reference corpus
//!
//! Loaded once from a JSON array of records:
//! ```json
//! [
//!   { "code": "8413.70", "description": "Centrifugal pumps", "category": "Machinery",
//!     "premium": true, "trade_volume": 1250000.0 }
//! ]
//! ```

use super::{CorpusError, ReferenceCorpus};
use crate::engine::formatter::{digits_only, heading_number};
use crate::types::ReferenceEntry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Corpus record with premium metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusRecord {
    #[serde(flatten)]
    pub entry: ReferenceEntry,
    /// Flagged with enriched trade-volume/insight metadata
    #[serde(default)]
    pub premium: bool,
    /// Annual trade volume, used to rank the premium subset
    #[serde(default)]
    pub trade_volume: Option<f64>,
}

impl CorpusRecord {
    pub fn standard(entry: ReferenceEntry) -> Self {
        Self {
            entry,
            premium: false,
            trade_volume: None,
        }
    }

    pub fn premium(entry: ReferenceEntry, trade_volume: f64) -> Self {
        Self {
            entry,
            premium: true,
            trade_volume: Some(trade_volume),
        }
    }
}

/// Reference corpus held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    records: Vec<CorpusRecord>,
}

impl InMemoryCorpus {
    /// Corpus with no entries (Tiers 2/3 only)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<CorpusRecord>) -> Self {
        Self { records }
    }

    /// Corpus of standard (non-premium) entries
    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Self {
        Self::from_records(entries.into_iter().map(CorpusRecord::standard).collect())
    }

    /// Load records from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<CorpusRecord> = serde_json::from_str(&content)
            .map_err(|e| CorpusError::Parse(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "Loaded reference corpus"
        );

        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReferenceCorpus for InMemoryCorpus {
    async fn search_by_category(
        &self,
        code_range_start: &str,
        code_range_end: &str,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        let (Some(start), Some(end)) = (
            heading_number(code_range_start),
            heading_number(code_range_end),
        ) else {
            return Err(CorpusError::Query(format!(
                "invalid code range {}..{}",
                code_range_start, code_range_end
            )));
        };

        let mut matches: Vec<&ReferenceEntry> = self
            .records
            .iter()
            .map(|r| &r.entry)
            .filter(|e| heading_number(&e.code).is_some_and(|h| h >= start && h <= end))
            .collect();
        // Page by digits so "8413.70" and "841370" sort alike
        matches.sort_by_cached_key(|e| digits_only(&e.code));

        Ok(matches.into_iter().take(limit).cloned().collect())
    }

    async fn search_by_term(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .records
            .iter()
            .map(|r| &r.entry)
            .filter(|e| e.description.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search_premium_subset(
        &self,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        let mut premium: Vec<&CorpusRecord> = self.records.iter().filter(|r| r.premium).collect();
        premium.sort_by(|a, b| {
            let va = a.trade_volume.unwrap_or(0.0);
            let vb = b.trade_volume.unwrap_or(0.0);
            vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(premium
            .into_iter()
            .take(limit)
            .map(|r| r.entry.clone())
            .collect())
    }
}
