//! Reference Corpus Contract
//!
//! The corpus is an external, long-lived, read-only dataset of known
//! code → description associations. The engine only reads it, through the
//! `ReferenceCorpus` trait, and is handed an implementation at construction.
//!
//! # Backends
//! - **memory** - records loaded from a JSON file, or built in code for tests
//! - **sqlite** - read-only queries against an existing `reference_codes` table
//!
//! Every call is independently fallible. The engine treats any error (or a
//! timeout it imposes itself) as "no entries from this lookup".

pub mod memory;
pub mod sqlite;

pub use memory::{CorpusRecord, InMemoryCorpus};
pub use sqlite::SqliteCorpus;

use crate::types::ReferenceEntry;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Corpus lookup error
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Backend cannot be reached
    #[error("Corpus unavailable: {0}")]
    Unavailable(String),

    /// Lookup exceeded its time budget
    #[error("Corpus lookup timed out after {0}ms")]
    Timeout(u64),

    /// Query failed at the backend
    #[error("Query error: {0}")]
    Query(String),

    /// Corpus data could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error (file read)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only reference corpus lookups
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
/// use tariff_classifier::corpus::{InMemoryCorpus, ReferenceCorpus};
///
/// let corpus: Arc<dyn ReferenceCorpus> = Arc::new(InMemoryCorpus::from_json_file(path)?);
/// let pumps = corpus.search_by_category("8401", "8487", 25).await?;
/// ```
#[async_trait]
pub trait ReferenceCorpus: Send + Sync {
    /// Entries whose four-digit heading lies in `[code_range_start, code_range_end]`
    async fn search_by_category(
        &self,
        code_range_start: &str,
        code_range_end: &str,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError>;

    /// Entries whose description mentions `term`
    async fn search_by_term(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError>;

    /// Curated, trade-volume-ranked entries
    async fn search_premium_subset(&self, limit: usize)
        -> Result<Vec<ReferenceEntry>, CorpusError>;
}

/// Open a corpus file, choosing the backend by extension
///
/// `.db`, `.sqlite` and `.sqlite3` open an SQLite corpus; anything else is
/// read as a JSON record array.
pub async fn open_corpus(path: &Path) -> Result<Arc<dyn ReferenceCorpus>, CorpusError> {
    let is_sqlite = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "db" | "sqlite" | "sqlite3"));

    if is_sqlite {
        Ok(Arc::new(SqliteCorpus::open(path).await?))
    } else {
        Ok(Arc::new(InMemoryCorpus::from_json_file(path)?))
    }
}
