//! Test Helper Utilities
//!
//! Shared stubs and fixtures for tariff-classifier integration tests

#![allow(dead_code)]

pub mod corpora;
pub mod log_capture;

pub use corpora::{CountingCorpus, CountingStrategy, FailingCorpus, SlowCorpus};
pub use log_capture::LogCapture;

use std::path::PathBuf;
use std::sync::Arc;
use tariff_classifier::corpus::InMemoryCorpus;
use tariff_classifier::types::ReferenceEntry;
use tariff_classifier::{ClassificationEngine, ClassifierConfig, ReferenceCorpus};

/// Path of a file under tests/fixtures
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Corpus holding two machinery headings (pumps and valves)
pub fn machinery_corpus() -> Arc<dyn ReferenceCorpus> {
    Arc::new(InMemoryCorpus::from_entries(vec![
        ReferenceEntry::new("8413", "Pumps for liquids, motor driven").with_category("Machinery"),
        ReferenceEntry::new("8481", "Taps, cocks, valves and similar appliances for pipes")
            .with_category("Machinery"),
    ]))
}

/// Standard engine with default configuration
pub fn engine_with(corpus: Arc<dyn ReferenceCorpus>) -> ClassificationEngine {
    ClassificationEngine::new(corpus, ClassifierConfig::default())
        .expect("default configuration is valid")
}
