//! # Tariff Common Library
//!
//! Shared code for the tariff classification workspace:
//! - Error type (`Error`, `Result`)
//! - Configuration file resolution and TOML loading
//! - Logging configuration and tracing initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
