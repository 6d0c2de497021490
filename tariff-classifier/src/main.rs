//! tariff-classify - command-line product classifier
//!
//! Classifies one product description and prints the ranked result as JSON.
//!
//! ```text
//! tariff-classify "stainless steel bracket" --industry Manufacturing --corpus codes.db
//! ```
//!
//! Without a corpus only the rule-based tiers can answer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tariff_classifier::corpus::{open_corpus, InMemoryCorpus, ReferenceCorpus};
use tariff_classifier::events::{EventEmitter, DEFAULT_EVENT_CAPACITY};
use tariff_classifier::{ClassificationEngine, ClassificationRequest, ServiceConfig};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Command-line arguments for tariff-classify
#[derive(Parser, Debug)]
#[command(name = "tariff-classify")]
#[command(about = "Classify a product description into commodity tariff codes")]
#[command(version)]
struct Args {
    /// Free-text product description
    description: String,

    /// Industry hint, e.g. "Electronics"
    #[arg(short, long, env = "TARIFF_INDUSTRY")]
    industry: Option<String>,

    /// Reference corpus (.db/.sqlite for SQLite, otherwise JSON)
    #[arg(short, long)]
    corpus: Option<PathBuf>,

    /// Configuration file (overrides TARIFF_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of candidates to return
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print classification events to stderr
    #[arg(long)]
    events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        ServiceConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = args.corpus.clone() {
        config.corpus.path = Some(path);
    }
    if let Some(limit) = args.limit {
        config.classifier.result_limit = limit;
    }

    tariff_common::logging::init_tracing(&config.logging)
        .context("Failed to initialize logging")?;
    info!("tariff-classify {}", env!("CARGO_PKG_VERSION"));

    let corpus: Arc<dyn ReferenceCorpus> = match config.corpus.path.as_deref() {
        Some(path) => match open_corpus(path).await {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Reference corpus unavailable, continuing with rule-based tiers"
                );
                Arc::new(InMemoryCorpus::empty())
            }
        },
        None => {
            info!("No reference corpus configured, using rule-based tiers only");
            Arc::new(InMemoryCorpus::empty())
        }
    };

    let (emitter, mut event_rx) = EventEmitter::channel(DEFAULT_EVENT_CAPACITY);
    let engine = ClassificationEngine::new(corpus, config.classifier.clone())
        .context("Invalid classifier configuration")?
        .with_events(emitter);

    let request = ClassificationRequest::new(args.description, args.industry.as_deref());

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, abandoning classification");
            cancel_on_signal.cancel();
        }
    });

    let Some(result) = engine.classify_cancellable(&request, cancel).await else {
        anyhow::bail!("Classification cancelled");
    };

    if args.events {
        while let Ok(event) = event_rx.try_recv() {
            eprintln!("{}", serde_json::to_string(&event)?);
        }
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to serialize result")?
    );
    Ok(())
}
