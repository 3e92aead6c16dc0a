//! Signing CA readiness verification.
//!
//! Every call fully re-derives the issuer's `Ready` condition from the
//! stored keypair:
//!
//! ```text
//! fetch tls.crt ──err──► Failed   (Warning, ErrGetKeyPair)     ─► Err
//!      │
//! fetch tls.key ──err──► Failed   (Warning, ErrGetKeyPair)     ─► Err
//!      │
//! cert.is_ca? ───no───► Invalid  (Warning, ErrInvalidKeyPair) ─► Ok
//!      │
//!     yes ────────────► Verified (Normal, KeyPairVerified)     ─► Ok
//! ```
//!
//! A certificate that is not a CA is recorded as not ready without returning
//! an error; only fetch failures reach the caller.

use std::sync::Arc;

use ca_issuer_core::reason::{
    ERR_GET_KEY_PAIR, ERR_INVALID_KEY_PAIR, KEY_PAIR_VERIFIED, MESSAGE_ERROR_GET_KEY_PAIR,
    MESSAGE_KEY_PAIR_VERIFIED, MESSAGE_NOT_A_CA,
};
use ca_issuer_core::{
    ConditionStatus, EventType, IssuerConditionType, IssuerError, IssuerRef, KeyPairRecord,
    Result,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

use crate::conditions::ConditionStore;
use crate::config::VerifierConfig;
use crate::recorder::EventRecorder;
use crate::secrets::SecretStore;

/// Result of one verification, before it is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Either half of the keypair could not be fetched or decoded
    KeyPairFetchFailed {
        /// Full message, including the collaborator's error text
        message: String,
    },
    /// Keypair fetched but the certificate is not a CA
    NotACertificateAuthority,
    /// Signing CA verified
    Verified,
}

impl VerificationOutcome {
    /// Outcome for a failed fetch
    #[must_use]
    pub fn fetch_failed(err: &IssuerError) -> Self {
        Self::KeyPairFetchFailed {
            message: format!("{MESSAGE_ERROR_GET_KEY_PAIR}{err}"),
        }
    }

    /// Classify a successfully fetched keypair
    #[must_use]
    pub const fn classify(record: &KeyPairRecord) -> Self {
        if record.certificate.is_ca {
            Self::Verified
        } else {
            Self::NotACertificateAuthority
        }
    }

    /// Stable reason code
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::KeyPairFetchFailed { .. } => ERR_GET_KEY_PAIR,
            Self::NotACertificateAuthority => ERR_INVALID_KEY_PAIR,
            Self::Verified => KEY_PAIR_VERIFIED,
        }
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::KeyPairFetchFailed { message } => message.clone(),
            Self::NotACertificateAuthority => {
                format!("{MESSAGE_ERROR_GET_KEY_PAIR}{MESSAGE_NOT_A_CA}")
            }
            Self::Verified => MESSAGE_KEY_PAIR_VERIFIED.to_string(),
        }
    }

    /// Event severity
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Verified => EventType::Normal,
            _ => EventType::Warning,
        }
    }

    /// Status written to the `Ready` condition
    #[must_use]
    pub const fn condition_status(&self) -> ConditionStatus {
        match self {
            Self::Verified => ConditionStatus::True,
            _ => ConditionStatus::False,
        }
    }
}

/// Verifies that a CA issuer's keypair secret holds a usable signing CA.
///
/// Stateless between calls; safe to share across tasks.
#[derive(Clone)]
pub struct CaVerifier {
    config: Arc<VerifierConfig>,
    secrets: Arc<dyn SecretStore>,
    recorder: Arc<dyn EventRecorder>,
    conditions: Arc<dyn ConditionStore>,
}

impl CaVerifier {
    /// Create a verifier over the given collaborators
    pub fn new(
        config: VerifierConfig,
        secrets: Arc<dyn SecretStore>,
        recorder: Arc<dyn EventRecorder>,
        conditions: Arc<dyn ConditionStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            secrets,
            recorder,
            conditions,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify the signing CA and publish the issuer's `Ready` condition.
    ///
    /// Exactly one condition write and one event happen per call.
    ///
    /// # Errors
    ///
    /// Returns the secret store's error unchanged if either half of the
    /// keypair cannot be fetched. A certificate that is not a CA is not an
    /// error.
    #[instrument(
        skip(self, cancel, issuer),
        fields(
            issuer = %issuer.key(),
            secret = %issuer.secret_name,
            generation = issuer.generation,
        )
    )]
    pub async fn verify(&self, cancel: &CancellationToken, issuer: &IssuerRef) -> Result<()> {
        let namespace = self.config.resource_namespace(issuer);

        let record = match self.fetch_key_pair(cancel, namespace, &issuer.secret_name).await {
            Ok(record) => record,
            Err(err) => {
                self.publish(issuer, &VerificationOutcome::fetch_failed(&err)).await;
                return Err(err);
            }
        };

        let outcome = VerificationOutcome::classify(&record);
        match outcome {
            VerificationOutcome::Verified => debug!(
                namespace,
                fingerprint = %record.certificate.fingerprint,
                "signing CA verified"
            ),
            _ => error!(
                namespace,
                subject = %record.certificate.subject,
                "signing certificate is not a CA"
            ),
        }
        self.publish(issuer, &outcome).await;
        Ok(())
    }

    /// Fetch the certificate, then the private key.
    async fn fetch_key_pair(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        secret_name: &str,
    ) -> Result<KeyPairRecord> {
        let certificate = self
            .secrets
            .get_certificate(cancel, namespace, secret_name)
            .await
            .map_err(|e| {
                error!(
                    namespace,
                    error = %e,
                    retryable = e.is_retryable(),
                    "error getting signing CA TLS certificate"
                );
                e
            })?;

        let private_key = self
            .secrets
            .get_private_key(cancel, namespace, secret_name)
            .await
            .map_err(|e| {
                error!(
                    namespace,
                    error = %e,
                    retryable = e.is_retryable(),
                    "error getting signing CA private key"
                );
                e
            })?;

        Ok(KeyPairRecord {
            certificate,
            private_key,
        })
    }

    /// Emit the outcome's event and overwrite the `Ready` condition.
    async fn publish(&self, issuer: &IssuerRef, outcome: &VerificationOutcome) {
        let reason = outcome.reason();
        let message = outcome.message();

        self.recorder.event(issuer, outcome.event_type(), reason, &message);

        // Write failures never reach the caller.
        if let Err(e) = self
            .conditions
            .set_condition(
                issuer,
                issuer.generation,
                IssuerConditionType::Ready,
                outcome.condition_status(),
                reason,
                &message,
            )
            .await
        {
            warn!(error = %e, reason, "failed to persist issuer Ready condition");
        }
    }
}
