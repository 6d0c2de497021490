//! Classification Event Side-Channel
//!
//! Structured events emitted at fixed points of the orchestrator, fanned out
//! over a `tokio::sync::broadcast` channel. Emission never affects the
//! classification itself: a missing or lagging subscriber is not an error.

use crate::types::SourceTier;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Default broadcast channel capacity
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Events emitted while classifying a request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassificationEvent {
    /// Request accepted and terms extracted
    ClassificationStarted {
        request_id: Uuid,
        term_count: usize,
        category_count: usize,
        has_hint: bool,
        timestamp: DateTime<Utc>,
    },

    /// A tier is about to run
    TierStarted {
        request_id: Uuid,
        tier: SourceTier,
        timestamp: DateTime<Utc>,
    },

    /// A tier returned (possibly zero) candidates
    TierCompleted {
        request_id: Uuid,
        tier: SourceTier,
        candidate_count: usize,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A tier returned an error (treated as zero candidates)
    TierFailed {
        request_id: Uuid,
        tier: SourceTier,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// A single corpus lookup failed or timed out
    LookupFailed {
        request_id: Uuid,
        lookup: String,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// A tier was sufficient; remaining tiers are skipped
    ShortCircuit {
        request_id: Uuid,
        tier: SourceTier,
        skipped_tiers: usize,
        timestamp: DateTime<Utc>,
    },

    /// Moving on to the next tier (or straight to the fallback)
    FallbackTriggered {
        request_id: Uuid,
        from_tier: Option<SourceTier>,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Final result produced
    ClassificationCompleted {
        request_id: Uuid,
        resolved_by: SourceTier,
        candidate_count: usize,
        best_code: Option<String>,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

impl ClassificationEvent {
    /// Request the event belongs to
    pub fn request_id(&self) -> Uuid {
        match self {
            Self::ClassificationStarted { request_id, .. }
            | Self::TierStarted { request_id, .. }
            | Self::TierCompleted { request_id, .. }
            | Self::TierFailed { request_id, .. }
            | Self::LookupFailed { request_id, .. }
            | Self::ShortCircuit { request_id, .. }
            | Self::FallbackTriggered { request_id, .. }
            | Self::ClassificationCompleted { request_id, .. } => *request_id,
        }
    }

    /// Event type name as serialized
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ClassificationStarted { .. } => "classification_started",
            Self::TierStarted { .. } => "tier_started",
            Self::TierCompleted { .. } => "tier_completed",
            Self::TierFailed { .. } => "tier_failed",
            Self::LookupFailed { .. } => "lookup_failed",
            Self::ShortCircuit { .. } => "short_circuit",
            Self::FallbackTriggered { .. } => "fallback_triggered",
            Self::ClassificationCompleted { .. } => "classification_completed",
        }
    }
}

/// Broadcast emitter for classification events
///
/// Cheap to clone; a disabled emitter drops every event.
#[derive(Debug, Clone, Default)]
pub struct EventEmitter {
    tx: Option<broadcast::Sender<ClassificationEvent>>,
}

impl EventEmitter {
    pub fn new(tx: broadcast::Sender<ClassificationEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Emitter that drops all events
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Create an emitter together with its first subscriber
    pub fn channel(capacity: usize) -> (Self, broadcast::Receiver<ClassificationEvent>) {
        let (tx, rx) = broadcast::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    /// Subscribe a new receiver (None when disabled)
    pub fn subscribe(&self) -> Option<broadcast::Receiver<ClassificationEvent>> {
        self.tx.as_ref().map(|tx| tx.subscribe())
    }

    /// Emit an event
    ///
    /// Returns true if at least one receiver got it.
    pub fn emit(&self, event: ClassificationEvent) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };

        let event_type = event.event_type();
        match tx.send(event) {
            Ok(receiver_count) => {
                debug!(event_type, receiver_count, "Classification event broadcast");
                true
            }
            Err(_) => {
                // No receivers - this is fine
                debug!(event_type, "No receivers for classification event");
                false
            }
        }
    }
}
