//! Stable reason codes and messages published on CA issuer conditions and events.
//!
//! Downstream alerting keys on these strings; they must not change.

/// The keypair secret could not be fetched or decoded.
pub const ERR_GET_KEY_PAIR: &str = "ErrGetKeyPair";

/// The keypair was fetched but the certificate is not a CA.
pub const ERR_INVALID_KEY_PAIR: &str = "ErrInvalidKeyPair";

/// The signing CA keypair was verified.
pub const KEY_PAIR_VERIFIED: &str = "KeyPairVerified";

/// Prefix for every keypair failure message.
pub const MESSAGE_ERROR_GET_KEY_PAIR: &str = "Error getting keypair for CA issuer: ";

/// Detail appended to [`MESSAGE_ERROR_GET_KEY_PAIR`] for a non-CA certificate.
pub const MESSAGE_NOT_A_CA: &str = "certificate is not a CA";

/// Message for a verified signing CA.
pub const MESSAGE_KEY_PAIR_VERIFIED: &str = "Signing CA verified";
