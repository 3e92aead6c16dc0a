//! # ca-issuer
//!
//! Readiness verification for CA-backed certificate issuers.
//!
//! A CA issuer points at a secret holding a signing certificate and its
//! private key. On every issuer sync the reconciliation loop calls
//! [`CaVerifier::verify`], which fetches both halves, checks that the
//! certificate is a CA, and publishes the outcome as an event plus the
//! issuer's `Ready` condition.
//!
//! ## Outcomes
//!
//! | Outcome                    | Event   | Ready   | Reason              | Returns |
//! |----------------------------|---------|---------|---------------------|---------|
//! | keypair fetch/decode fails | Warning | `False` | `ErrGetKeyPair`     | `Err`   |
//! | certificate is not a CA    | Warning | `False` | `ErrInvalidKeyPair` | `Ok`    |
//! | signing CA verified        | Normal  | `True`  | `KeyPairVerified`   | `Ok`    |
//!
//! ## Collaborators
//!
//! - [`SecretStore`] fetches and decodes the keypair
//! - [`EventRecorder`] receives one event per call
//! - [`ConditionStore`] persists the `Ready` condition
//!
//! In-memory implementations of all three ship with the crate.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ca_issuer::{
//!     CaVerifier, MemoryConditionStore, MemoryRecorder, MemorySecretStore, VerifierConfig,
//! };
//! use ca_issuer_core::IssuerRef;
//! use tokio_util::sync::CancellationToken;
//!
//! let secrets = Arc::new(MemorySecretStore::default());
//! secrets.insert_tls("ns1", "ca-secret", &cert_pem, &key_pem).await;
//!
//! let verifier = CaVerifier::new(
//!     VerifierConfig::default(),
//!     secrets,
//!     Arc::new(MemoryRecorder::new()),
//!     Arc::new(MemoryConditionStore::new()),
//! );
//!
//! let issuer = IssuerRef::issuer("ns1", "ca", "ca-secret").with_generation(1);
//! verifier.verify(&CancellationToken::new(), &issuer).await?;
//! ```

pub mod conditions;
pub mod config;
pub mod keypair;
pub mod recorder;
pub mod secrets;
pub mod verify;

pub use ca_issuer_core::{IssuerError, Result};
pub use conditions::{ConditionStore, MemoryConditionStore};
pub use config::VerifierConfig;
pub use recorder::{EventRecorder, MemoryRecorder};
pub use secrets::{MemorySecretStore, SecretData, SecretStore};
pub use verify::{CaVerifier, VerificationOutcome};

#[cfg(test)]
pub(crate) mod testutil {
    //! Certificate fixtures generated at test time.

    use rcgen::{
        BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
        KeyUsagePurpose,
    };

    /// Self-signed CA certificate and its PKCS#8 key, both PEM.
    pub fn ca_keypair_pem(common_name: &str) -> (String, String) {
        let key_pair = KeyPair::generate().expect("generate CA key");

        let mut params = CertificateParams::default();
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, common_name);
        params.distinguished_name = dn;
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];

        let cert = params.self_signed(&key_pair).expect("self-sign CA");
        (cert.pem(), key_pair.serialize_pem())
    }

    /// Self-signed end-entity certificate without CA basic constraints.
    pub fn leaf_keypair_pem(domain: &str) -> (String, String) {
        let key_pair = KeyPair::generate().expect("generate leaf key");

        let mut params =
            CertificateParams::new(vec![domain.to_string()]).expect("valid domain");
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, domain);
        params.distinguished_name = dn;
        params.is_ca = IsCa::NoCa;
        params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
        ];

        let cert = params.self_signed(&key_pair).expect("self-sign leaf");
        (cert.pem(), key_pair.serialize_pem())
    }
}
