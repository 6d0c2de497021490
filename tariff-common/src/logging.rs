//! Logging configuration and tracing initialisation
//!
//! `RUST_LOG` always takes precedence over the configured level, so a single
//! run can be made verbose without touching the config file.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Validate the configured level
    pub fn validate(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(self.level.trim()).map_err(|_| {
            Error::Config(format!(
                "Invalid log level '{}' (expected trace, debug, info, warn or error)",
                self.level
            ))
        })
    }
}

/// Initialize the global tracing subscriber
///
/// Logs go to stderr, or to `config.file` (appending, no ANSI colours) when set.
/// Fails if the level is invalid, the log file cannot be opened, or a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let level = config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let (stderr_layer, file_layer) = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file));
            (None, Some(layer))
        }
        None => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Tracing initialisation failed: {}", e)))
}
