//! Decoded signing keypair material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SHA-256 fingerprint of a certificate's DER encoding (hex).
pub type CertFingerprint = String;

/// A decoded signing certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningCertificate {
    /// Subject distinguished name (human-readable)
    pub subject: String,
    /// Issuer distinguished name (human-readable)
    pub issuer: String,
    /// Serial number (hex)
    pub serial: String,
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// SHA-256 fingerprint of DER bytes
    pub fingerprint: CertFingerprint,
    /// Basic constraints mark this certificate as a CA
    pub is_ca: bool,
}

/// Encoding of a decoded private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivateKeyFormat {
    /// `PRIVATE KEY`
    Pkcs8,
    /// `RSA PRIVATE KEY`
    Pkcs1,
    /// `EC PRIVATE KEY`
    Sec1,
}

impl PrivateKeyFormat {
    /// Map a PEM tag to a key format
    #[must_use]
    pub fn from_pem_tag(tag: &str) -> Option<Self> {
        match tag {
            "PRIVATE KEY" => Some(Self::Pkcs8),
            "RSA PRIVATE KEY" => Some(Self::Pkcs1),
            "EC PRIVATE KEY" => Some(Self::Sec1),
            _ => None,
        }
    }
}

/// A decoded private key. Contents are opaque and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    format: PrivateKeyFormat,
    der: Vec<u8>,
}

impl PrivateKey {
    /// Wrap DER-encoded key bytes
    #[must_use]
    pub const fn new(format: PrivateKeyFormat, der: Vec<u8>) -> Self {
        Self { format, der }
    }

    /// Encoding the key was stored in
    #[must_use]
    pub const fn format(&self) -> PrivateKeyFormat {
        self.format
    }

    /// Raw DER bytes
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("format", &self.format)
            .field("der", &"<redacted>")
            .finish()
    }
}

/// Certificate and private key fetched for one verification.
#[derive(Debug, Clone)]
pub struct KeyPairRecord {
    /// The signing certificate
    pub certificate: SigningCertificate,
    /// Its private key
    pub private_key: PrivateKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_key_debug_is_redacted() {
        let key = PrivateKey::new(PrivateKeyFormat::Pkcs8, vec![0xde, 0xad, 0xbe, 0xef]);
        let printed = format!("{key:?}");
        assert!(printed.contains("redacted"));
        assert!(!printed.contains("222"));
    }

    #[test]
    fn pem_tags() {
        let cases = [
            ("PRIVATE KEY", Some(PrivateKeyFormat::Pkcs8)),
            ("RSA PRIVATE KEY", Some(PrivateKeyFormat::Pkcs1)),
            ("EC PRIVATE KEY", Some(PrivateKeyFormat::Sec1)),
            ("CERTIFICATE", None),
        ];
        for (tag, expected) in cases {
            assert_eq!(PrivateKeyFormat::from_pem_tag(tag), expected, "tag {tag}");
        }
    }
}
