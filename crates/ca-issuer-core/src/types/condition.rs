//! Issuer status conditions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::reason;

/// Status value of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    /// Condition holds
    True,
    /// Condition does not hold
    False,
    /// Not yet determined
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Type of an issuer condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuerConditionType {
    /// The issuer can sign certificates
    Ready,
}

impl IssuerConditionType {
    /// Returns the condition type name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
        }
    }
}

/// A single condition attached to an issuer's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerCondition {
    /// Condition type
    #[serde(rename = "type")]
    pub condition_type: IssuerConditionType,
    /// Current status
    pub status: ConditionStatus,
    /// Last time `status` changed value
    pub last_transition_time: DateTime<Utc>,
    /// Stable reason code
    pub reason: String,
    /// Human-readable detail
    pub message: String,
    /// Issuer generation this condition was computed from
    pub observed_generation: i64,
}

/// Status block of an issuer resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerStatus {
    /// Conditions, at most one per type
    #[serde(default)]
    pub conditions: Vec<IssuerCondition>,
}

impl IssuerStatus {
    /// Set a condition, replacing any existing condition of the same type.
    ///
    /// The transition time moves only when the status value changes.
    pub fn set_condition(
        &mut self,
        observed_generation: i64,
        condition_type: IssuerConditionType,
        status: ConditionStatus,
        reason: &str,
        message: &str,
    ) {
        self.set_condition_at(
            Utc::now(),
            observed_generation,
            condition_type,
            status,
            reason,
            message,
        );
    }

    /// [`Self::set_condition`] with an explicit clock reading.
    pub fn set_condition_at(
        &mut self,
        now: DateTime<Utc>,
        observed_generation: i64,
        condition_type: IssuerConditionType,
        status: ConditionStatus,
        reason: &str,
        message: &str,
    ) {
        let mut condition = IssuerCondition {
            condition_type,
            status,
            last_transition_time: now,
            reason: reason.to_string(),
            message: message.to_string(),
            observed_generation,
        };

        match self.conditions.iter_mut().find(|c| c.condition_type == condition_type) {
            Some(existing) => {
                if existing.status == status {
                    condition.last_transition_time = existing.last_transition_time;
                }
                *existing = condition;
            }
            None => self.conditions.push(condition),
        }
    }

    /// Look up a condition by type
    #[must_use]
    pub fn condition(&self, condition_type: IssuerConditionType) -> Option<&IssuerCondition> {
        self.conditions.iter().find(|c| c.condition_type == condition_type)
    }

    /// Current readiness derived from the `Ready` condition
    #[must_use]
    pub fn readiness(&self) -> ReadinessState {
        ReadinessState::from_condition(self.condition(IssuerConditionType::Ready))
    }
}

/// Externally observed readiness of a CA issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessState {
    /// Never verified
    Unknown,
    /// Keypair could not be fetched or decoded
    Failed,
    /// Keypair fetched but unusable as a CA
    Invalid,
    /// Signing CA verified
    Verified,
}

impl ReadinessState {
    /// Classify a `Ready` condition by its reason code.
    ///
    /// Conditions written by other controllers map to `Unknown`.
    #[must_use]
    pub fn from_condition(condition: Option<&IssuerCondition>) -> Self {
        let Some(condition) = condition else {
            return Self::Unknown;
        };
        match (condition.status, condition.reason.as_str()) {
            (ConditionStatus::True, reason::KEY_PAIR_VERIFIED) => Self::Verified,
            (ConditionStatus::False, reason::ERR_GET_KEY_PAIR) => Self::Failed,
            (ConditionStatus::False, reason::ERR_INVALID_KEY_PAIR) => Self::Invalid,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ReadinessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Failed => write!(f, "Failed"),
            Self::Invalid => write!(f, "Invalid"),
            Self::Verified => write!(f, "Verified"),
        }
    }
}
