//! Verifier configuration.

use ca_issuer_core::{IssuerError, IssuerKind, IssuerRef, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the CA readiness verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Namespace holding keypair secrets for cluster-scoped issuers.
    #[serde(default = "default_cluster_resource_namespace")]
    pub cluster_resource_namespace: String,

    /// Secret data key of the PEM certificate.
    #[serde(default = "default_certificate_key")]
    pub certificate_key: String,

    /// Secret data key of the PEM private key.
    #[serde(default = "default_private_key_key")]
    pub private_key_key: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            cluster_resource_namespace: default_cluster_resource_namespace(),
            certificate_key: default_certificate_key(),
            private_key_key: default_private_key_key(),
        }
    }
}

impl VerifierConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self =
                toml::from_str(&content).map_err(|e| IssuerError::Config(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject empty namespaces and data keys.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_resource_namespace.is_empty() {
            return Err(IssuerError::Config(
                "cluster_resource_namespace must not be empty".into(),
            ));
        }
        if self.certificate_key.is_empty() || self.private_key_key.is_empty() {
            return Err(IssuerError::Config("secret data keys must not be empty".into()));
        }
        Ok(())
    }

    /// Namespace in which an issuer's keypair secret is looked up.
    #[must_use]
    pub fn resource_namespace<'a>(&'a self, issuer: &'a IssuerRef) -> &'a str {
        match issuer.kind {
            IssuerKind::Issuer => &issuer.namespace,
            IssuerKind::ClusterIssuer => &self.cluster_resource_namespace,
        }
    }
}

// Default value functions for serde.
fn default_cluster_resource_namespace() -> String {
    String::from("cert-manager")
}

fn default_certificate_key() -> String {
    String::from("tls.crt")
}

fn default_private_key_key() -> String {
    String::from("tls.key")
}
