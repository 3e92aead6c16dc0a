//! Condition persistence for issuer status.

use std::collections::HashMap;

use async_trait::async_trait;
use ca_issuer_core::{
    ConditionStatus, IssuerCondition, IssuerConditionType, IssuerKey, IssuerRef, IssuerStatus,
    ReadinessState, Result,
};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Writes typed conditions onto an issuer's status.
///
/// A write replaces the issuer's existing condition of the same type.
/// Concurrent writers for the same issuer resolve last-writer-wins.
#[async_trait]
pub trait ConditionStore: Send + Sync {
    /// Set a condition on `issuer`.
    async fn set_condition(
        &self,
        issuer: &IssuerRef,
        observed_generation: i64,
        condition_type: IssuerConditionType,
        status: ConditionStatus,
        reason: &str,
        message: &str,
    ) -> Result<()>;
}

/// In-memory issuer status table.
#[derive(Debug, Default)]
pub struct MemoryConditionStore {
    statuses: RwLock<HashMap<IssuerKey, IssuerStatus>>,
}

impl MemoryConditionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full status of an issuer, if any condition was ever written
    pub async fn status(&self, issuer: &IssuerRef) -> Option<IssuerStatus> {
        self.statuses.read().await.get(&issuer.key()).cloned()
    }

    /// Current `Ready` condition of an issuer
    pub async fn ready_condition(&self, issuer: &IssuerRef) -> Option<IssuerCondition> {
        self.statuses
            .read()
            .await
            .get(&issuer.key())
            .and_then(|s| s.condition(IssuerConditionType::Ready).cloned())
    }

    /// Readiness of an issuer; `Unknown` if never written
    pub async fn readiness(&self, issuer: &IssuerRef) -> ReadinessState {
        self.statuses
            .read()
            .await
            .get(&issuer.key())
            .map_or(ReadinessState::Unknown, IssuerStatus::readiness)
    }
}

#[async_trait]
impl ConditionStore for MemoryConditionStore {
    #[instrument(skip(self, issuer, message), fields(issuer = %issuer.key()))]
    async fn set_condition(
        &self,
        issuer: &IssuerRef,
        observed_generation: i64,
        condition_type: IssuerConditionType,
        status: ConditionStatus,
        reason: &str,
        message: &str,
    ) -> Result<()> {
        self.statuses
            .write()
            .await
            .entry(issuer.key())
            .or_default()
            .set_condition(observed_generation, condition_type, status, reason, message);
        debug!(%status, reason, "condition written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ca_issuer_core::reason;

    async fn write(
        store: &MemoryConditionStore,
        issuer: &IssuerRef,
        status: ConditionStatus,
        reason: &str,
    ) {
        store
            .set_condition(
                issuer,
                issuer.generation,
                IssuerConditionType::Ready,
                status,
                reason,
                "message",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_until_written() {
        let store = MemoryConditionStore::new();
        let issuer = IssuerRef::issuer("ns1", "ca", "ca-secret");

        assert!(store.status(&issuer).await.is_none());
        assert_eq!(store.readiness(&issuer).await, ReadinessState::Unknown);
    }

    #[tokio::test]
    async fn overwrites_per_issuer() {
        let store = MemoryConditionStore::new();
        let a = IssuerRef::issuer("ns1", "a", "a-secret").with_generation(2);
        let b = IssuerRef::issuer("ns1", "b", "b-secret").with_generation(5);

        write(&store, &a, ConditionStatus::False, reason::ERR_GET_KEY_PAIR).await;
        write(&store, &a, ConditionStatus::True, reason::KEY_PAIR_VERIFIED).await;
        write(&store, &b, ConditionStatus::False, reason::ERR_INVALID_KEY_PAIR).await;

        assert_eq!(store.status(&a).await.unwrap().conditions.len(), 1);
        assert_eq!(store.readiness(&a).await, ReadinessState::Verified);
        assert_eq!(store.readiness(&b).await, ReadinessState::Invalid);
        assert_eq!(store.ready_condition(&b).await.unwrap().observed_generation, 5);
    }
}
