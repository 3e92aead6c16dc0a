use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::IssuerKey;

/// Severity of an issuer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// Informational outcome
    Normal,
    /// Something needs attention
    Warning,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// An event recorded against an issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerEvent {
    /// Issuer the event is about
    pub issuer: IssuerKey,
    /// Severity
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Stable reason code
    pub reason: String,
    /// Human-readable detail
    pub message: String,
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
}
