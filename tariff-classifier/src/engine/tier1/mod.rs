//! Tier 1: Reference Corpus Search
//!
//! Highest-trust tier. Candidates come from real corpus entries and carry
//! confidences in the `[confidence_floor, confidence_ceiling]` band.
//!
//! # Lookups (issued concurrently)
//! - **premium subset** - curated, trade-volume-ranked entries
//! - **category sweep** - one lookup per top category heading range
//! - **term lookups** - one lookup per top extracted term

pub mod corpus_search;
pub mod relevance;

pub use corpus_search::CorpusSearchStrategy;
