//! Secret store: fetches the signing keypair halves by namespace and name.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use ca_issuer_core::{IssuerError, PrivateKey, Result, SigningCertificate};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::config::VerifierConfig;
use crate::keypair::{decode_certificate_pem, decode_private_key_pem};

/// Raw secret payload: data key to bytes.
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Read access to stored keypair secrets.
///
/// Implementations must be safe for concurrent reads and should return
/// `IssuerError::Cancelled` promptly once `cancel` fires.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch and decode the certificate half of a keypair secret.
    async fn get_certificate(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        name: &str,
    ) -> Result<SigningCertificate>;

    /// Fetch and decode the private key half of a keypair secret.
    async fn get_private_key(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        name: &str,
    ) -> Result<PrivateKey>;
}

/// In-memory secret store holding raw TLS secret data.
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<(String, String), SecretData>>,
    certificate_key: String,
    private_key_key: String,
}

impl Default for MemorySecretStore {
    fn default() -> Self {
        Self::new(&VerifierConfig::default())
    }
}

impl MemorySecretStore {
    /// Create an empty store using the data keys from `config`
    #[must_use]
    pub fn new(config: &VerifierConfig) -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
            certificate_key: config.certificate_key.clone(),
            private_key_key: config.private_key_key.clone(),
        }
    }

    /// Insert or replace a secret
    pub async fn insert(&self, namespace: &str, name: &str, data: SecretData) {
        self.secrets
            .write()
            .await
            .insert((namespace.to_string(), name.to_string()), data);
    }

    /// Insert or replace a TLS secret from PEM strings
    pub async fn insert_tls(&self, namespace: &str, name: &str, cert_pem: &str, key_pem: &str) {
        let mut data = SecretData::new();
        data.insert(self.certificate_key.clone(), cert_pem.as_bytes().to_vec());
        data.insert(self.private_key_key.clone(), key_pem.as_bytes().to_vec());
        self.insert(namespace, name, data).await;
    }

    /// Remove a secret, returning its data if it existed
    pub async fn remove(&self, namespace: &str, name: &str) -> Option<SecretData> {
        self.secrets
            .write()
            .await
            .remove(&(namespace.to_string(), name.to_string()))
    }

    /// Look up one data key of a secret.
    async fn data(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Vec<u8>> {
        if cancel.is_cancelled() {
            return Err(IssuerError::Cancelled);
        }

        let secrets = self.secrets.read().await;
        let secret = secrets
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| IssuerError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })?;

        secret
            .get(key)
            .cloned()
            .ok_or_else(|| IssuerError::MissingData {
                key: key.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    #[instrument(skip(self, cancel))]
    async fn get_certificate(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        name: &str,
    ) -> Result<SigningCertificate> {
        let data = self
            .data(cancel, namespace, name, &self.certificate_key)
            .await?;
        let cert = decode_certificate_pem(&data)?;
        debug!(fingerprint = %cert.fingerprint, is_ca = cert.is_ca, "decoded certificate");
        Ok(cert)
    }

    #[instrument(skip(self, cancel))]
    async fn get_private_key(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        name: &str,
    ) -> Result<PrivateKey> {
        let data = self
            .data(cancel, namespace, name, &self.private_key_key)
            .await?;
        decode_private_key_pem(&data)
    }
}
