//! Tier 2: Algorithmic Generator
//!
//! Invoked only when the corpus produced nothing. Emits plausible codes from
//! material and function keyword rules with a fixed confidence decay.

pub mod algorithmic;

pub use algorithmic::{AlgorithmicStrategy, CodeRule, FUNCTION_RULES, MATERIAL_RULES};
