//! Tier 3: Static Pattern Table
//!
//! Universal safety net. Always yields exactly one candidate: a table match,
//! the hint-mapped entry, or the manual review sentinel.

pub mod static_patterns;

pub use static_patterns::{StaticPattern, StaticPatternStrategy, STATIC_PATTERNS};
