//! Configuration file resolution and TOML loading
//!
//! Configuration file priority:
//! 1. Command-line argument (highest priority)
//! 2. `TARIFF_CONFIG` environment variable
//! 3. Per-user config file (`~/.config/tariff/classifier.toml` on Linux)
//! 4. Built-in defaults (no file)
//!
//! A missing configuration file is never fatal: callers get a warning and the
//! compiled defaults. A file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "TARIFF_CONFIG";

/// File name of the per-user configuration file
const CONFIG_FILE_NAME: &str = "classifier.toml";

/// Resolve which configuration file (if any) should be loaded
///
/// Returns `None` when neither the CLI nor the environment names a file and
/// no per-user file exists; callers then run on built-in defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Some(path) = env_override(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    // Priority 3: Per-user config file, only if it is actually there
    default_config_path().filter(|p| p.exists())
}

/// Platform default location of the per-user configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tariff").join(CONFIG_FILE_NAME))
}

/// Read a non-empty environment variable
///
/// Whitespace-only values are treated as unset.
pub fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load and deserialize a TOML file
pub fn load_toml_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Load a TOML file, falling back to defaults when no file is available
///
/// - `None` path → defaults (info log)
/// - path that does not exist → defaults (warning)
/// - path that exists but is malformed → `Error::Config`
pub fn load_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        info!("No configuration file found, using built-in defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(
            "Configuration file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(T::default());
    }

    let config = load_toml_config(path)?;
    info!("Configuration loaded from {}", path.display());
    Ok(config)
}
