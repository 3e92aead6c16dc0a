//! Event recording for issuer outcomes.

use std::sync::{Mutex, PoisonError};

use ca_issuer_core::{EventType, IssuerEvent, IssuerRef};
use chrono::Utc;
use tracing::{info, warn};

/// Append-only sink for issuer events.
///
/// Recording is fire-and-forget: implementations must not block the caller
/// and have no way to report failure.
pub trait EventRecorder: Send + Sync {
    /// Record an event against `issuer`.
    fn event(&self, issuer: &IssuerRef, event_type: EventType, reason: &str, message: &str);
}

/// Recorder that keeps events in memory and mirrors them to the log.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    events: Mutex<Vec<IssuerEvent>>,
}

impl MemoryRecorder {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, oldest first
    #[must_use]
    pub fn events(&self) -> Vec<IssuerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventRecorder for MemoryRecorder {
    fn event(&self, issuer: &IssuerRef, event_type: EventType, reason: &str, message: &str) {
        let key = issuer.key();
        match event_type {
            EventType::Normal => info!(issuer = %key, reason, message, "issuer event"),
            EventType::Warning => warn!(issuer = %key, reason, message, "issuer event"),
        }

        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(IssuerEvent {
                issuer: key,
                event_type,
                reason: reason.to_string(),
                message: message.to_string(),
                timestamp: Utc::now(),
            });
    }
}
