//! SQLite reference corpus
//!
//! Read-only queries against an existing database containing:
//!
//! ```sql
//! CREATE TABLE reference_codes (
//!     code         TEXT NOT NULL,
//!     description  TEXT NOT NULL,
//!     category     TEXT,
//!     premium      INTEGER NOT NULL DEFAULT 0,
//!     trade_volume REAL
//! );
//! ```
//!
//! The engine never writes to the corpus; the database is opened read-only.

use super::{CorpusError, ReferenceCorpus};
use crate::engine::formatter::heading_number;
use crate::types::ReferenceEntry;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

const POOL_SIZE: u32 = 4;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

type EntryRow = (String, String, Option<String>);

fn into_entry((code, description, category): EntryRow) -> ReferenceEntry {
    ReferenceEntry {
        code,
        description,
        category,
    }
}

/// Reference corpus backed by an SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteCorpus {
    pool: SqlitePool,
}

impl SqliteCorpus {
    /// Open an existing corpus database read-only
    pub async fn open(db_path: &Path) -> Result<Self, CorpusError> {
        if !db_path.exists() {
            return Err(CorpusError::Unavailable(format!(
                "corpus database {} not found",
                db_path.display()
            )));
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(POOL_SIZE)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(db_path)
                    .read_only(true),
            )
            .await
            .map_err(|e| {
                CorpusError::Unavailable(format!("open {} failed: {}", db_path.display(), e))
            })?;

        tracing::info!(path = %db_path.display(), "Opened SQLite reference corpus");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceCorpus for SqliteCorpus {
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

        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT code, description, category
            FROM reference_codes
            WHERE CAST(substr(replace(code, '.', ''), 1, 4) AS INTEGER) BETWEEN ? AND ?
            ORDER BY replace(code, '.', '')
            LIMIT ?
            "#,
        )
        .bind(i64::from(start))
        .bind(i64::from(end))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_entry).collect())
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

        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT code, description, category
            FROM reference_codes
            WHERE instr(lower(description), ?) > 0
            ORDER BY code
            LIMIT ?
            "#,
        )
        .bind(needle)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_entry).collect())
    }

    async fn search_premium_subset(
        &self,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>, CorpusError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT code, description, category
            FROM reference_codes
            WHERE premium = 1
            ORDER BY trade_volume DESC, code
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_entry).collect())
    }
}
