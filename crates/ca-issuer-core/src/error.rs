use thiserror::Error;

/// Result type alias for issuer operations
pub type Result<T> = std::result::Result<T, IssuerError>;

/// Errors that can occur while fetching, decoding or recording issuer state
#[derive(Error, Debug)]
pub enum IssuerError {
    /// The keypair secret does not exist
    #[error("secret \"{namespace}/{name}\" not found")]
    SecretNotFound {
        /// Namespace that was searched
        namespace: String,
        /// Name of the missing secret
        name: String,
    },

    /// The secret exists but lacks the expected data key
    #[error("no data for \"{key}\" in secret '{namespace}/{name}'")]
    MissingData {
        /// Data key that was expected (e.g. `tls.crt`)
        key: String,
        /// Namespace of the secret
        namespace: String,
        /// Name of the secret
        name: String,
    },

    /// Certificate bytes could not be decoded into an X.509 certificate
    #[error("error decoding certificate: {0}")]
    CertificateDecode(String),

    /// Private key bytes could not be decoded
    #[error("error decoding private key: {0}")]
    PrivateKeyDecode(String),

    /// Access to the secret was refused by the backing store
    #[error("access denied to secret '{namespace}/{name}'")]
    AccessDenied {
        /// Namespace of the secret
        namespace: String,
        /// Name of the secret
        name: String,
    },

    /// The operation context was cancelled before the call completed
    #[error("operation cancelled")]
    Cancelled,

    /// Writing the issuer condition failed
    #[error("condition store error: {0}")]
    ConditionStore(String),

    /// Configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IssuerError {
    /// Returns true if the caller should retry with backoff.
    ///
    /// Every fetch failure, decode errors included, is retryable; only a bad
    /// configuration needs operator action first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }

    /// Returns true if the secret or one of its data keys is missing
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SecretNotFound { .. } | Self::MissingData { .. })
    }

    /// Returns true if the error was caused by cancellation
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_secret() {
        let err = IssuerError::SecretNotFound {
            namespace: "ns1".into(),
            name: "ca-secret".into(),
        };
        assert_eq!(err.to_string(), "secret \"ns1/ca-secret\" not found");
        assert!(err.is_not_found());
        assert!(err.is_retryable());
    }

    #[test]
    fn fetch_errors_are_retryable() {
        let fetch_errors = [
            IssuerError::MissingData {
                key: "tls.crt".into(),
                namespace: "ns1".into(),
                name: "ca-secret".into(),
            },
            IssuerError::CertificateDecode("bad pem".into()),
            IssuerError::PrivateKeyDecode("bad key".into()),
            IssuerError::AccessDenied {
                namespace: "ns1".into(),
                name: "ca-secret".into(),
            },
            IssuerError::Cancelled,
        ];
        for err in &fetch_errors {
            assert!(err.is_retryable(), "{err} should be retryable");
        }
        assert!(!IssuerError::CertificateDecode("bad pem".into()).is_not_found());
    }

    #[test]
    fn config_errors_are_not_retryable() {
        assert!(!IssuerError::Config("empty namespace".into()).is_retryable());
    }

    #[test]
    fn missing_data_message() {
        let err = IssuerError::MissingData {
            key: "tls.key".into(),
            namespace: "ns1".into(),
            name: "ca-secret".into(),
        };
        assert_eq!(
            err.to_string(),
            "no data for \"tls.key\" in secret 'ns1/ca-secret'"
        );
    }
}
