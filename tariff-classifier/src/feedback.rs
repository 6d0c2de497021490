//! Selection feedback contract
//!
//! When a person picks a candidate other than the top-ranked one, callers can
//! hand that selection to an external learning collaborator. The engine never
//! reads feedback back; there is no online learning loop.

use crate::engine::formatter::format_code;
use crate::types::{ClassificationRequest, ClassificationResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A human selection that disagreed with the top-ranked candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionFeedback {
    pub description: String,
    /// Canonical code the person chose
    pub selected_code: String,
    /// Canonical code the engine ranked first
    pub top_ranked_code: String,
    /// Industry / business type supplied with the request
    pub business_type: Option<String>,
}

impl SelectionFeedback {
    /// Build feedback for a selection
    ///
    /// Returns `None` when the selection matches the top-ranked candidate (or
    /// the result has no candidates), since there is nothing to learn.
    pub fn from_selection(
        request: &ClassificationRequest,
        result: &ClassificationResult,
        selected_code: &str,
    ) -> Option<Self> {
        let top = result.best_match.as_ref()?;
        let selected = format_code(selected_code);
        if selected == top.code {
            return None;
        }

        Some(Self {
            description: request.description.clone(),
            selected_code: selected,
            top_ranked_code: top.code.clone(),
            business_type: request.hint().map(str::to_string),
        })
    }
}

/// Destination for selection feedback
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn record(&self, feedback: SelectionFeedback) -> tariff_common::Result<()>;
}

/// Sink that writes feedback as a structured log event
#[derive(Debug, Default, Clone)]
pub struct TracingFeedbackSink;

#[async_trait]
impl FeedbackSink for TracingFeedbackSink {
    async fn record(&self, feedback: SelectionFeedback) -> tariff_common::Result<()> {
        info!(
            target: "tariff::feedback",
            description = %feedback.description,
            selected_code = %feedback.selected_code,
            top_ranked_code = %feedback.top_ranked_code,
            business_type = feedback.business_type.as_deref().unwrap_or("-"),
            "Selection differs from top-ranked candidate"
        );
        Ok(())
    }
}
