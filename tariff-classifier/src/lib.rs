//! tariff-classifier library interface
//!
//! Maps free-text product descriptions (plus an optional industry hint) to a
//! ranked shortlist of commodity classification codes with confidence scores.
//!
//! # Modules
//! - `engine` - term extraction, category mapping, the three tiers, ranking, orchestration
//! - `corpus` - read-only reference corpus contract and backends
//! - `events` - structured event side-channel
//! - `feedback` - selection feedback contract for external learning
//! - `config` - engine and service configuration
//! - `types` - request, candidate and result contracts

pub mod config;
pub mod corpus;
pub mod engine;
pub mod events;
pub mod feedback;
pub mod types;

pub use crate::config::{ClassifierConfig, ServiceConfig};
pub use crate::corpus::{CorpusError, InMemoryCorpus, ReferenceCorpus, SqliteCorpus};
pub use crate::engine::{ClassificationEngine, ClassificationStrategy};
pub use crate::events::{ClassificationEvent, EventEmitter};
pub use crate::types::{
    ClassificationCandidate, ClassificationRequest, ClassificationResult, ClassifierError,
    ClassifierResult, SourceTier,
};
