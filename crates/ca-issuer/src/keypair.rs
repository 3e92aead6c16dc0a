//! PEM decoding of signing certificates and private keys.

use ca_issuer_core::{IssuerError, PrivateKey, PrivateKeyFormat, Result, SigningCertificate};
use chrono::{DateTime, TimeZone, Utc};
use ring::digest::SHA256;
use ring::rand::SystemRandom;
use ring::signature::{self, EcdsaKeyPair, Ed25519KeyPair, RsaKeyPair};
use x509_parser::der_parser::ber::BerObjectContent;
use x509_parser::der_parser::der::parse_der;

/// Private scalar lengths of the supported SEC1 curves (P-256, P-384, P-521).
const SEC1_SCALAR_LENGTHS: &[usize] = &[32, 48, 66];

/// Decode the first `CERTIFICATE` block of a PEM bundle.
///
/// Any chain certificates after the first are ignored.
///
/// # Errors
///
/// Returns `IssuerError::CertificateDecode` if the bytes are not PEM, hold no
/// certificate, or the certificate is not valid X.509.
pub fn decode_certificate_pem(data: &[u8]) -> Result<SigningCertificate> {
    let pems = pem::parse_many(data).map_err(|e| {
        IssuerError::CertificateDecode(format!("error decoding certificate PEM block: {e}"))
    })?;

    let block = pems
        .iter()
        .find(|p| p.tag() == "CERTIFICATE")
        .ok_or_else(|| IssuerError::CertificateDecode("no CERTIFICATE PEM block found".into()))?;

    parse_x509_der(block.contents())
}

/// Decode a PKCS#8, PKCS#1 or SEC1 private key from PEM.
///
/// PKCS#8 keys must load as ECDSA P-256/P-384, Ed25519 or RSA. PKCS#1 keys
/// must load as RSA. SEC1 keys are checked structurally: version 1 and a
/// private scalar sized for a supported curve.
///
/// # Errors
///
/// Returns `IssuerError::PrivateKeyDecode` if no supported key block is found
/// or the key inside it does not parse.
pub fn decode_private_key_pem(data: &[u8]) -> Result<PrivateKey> {
    let pems = pem::parse_many(data).map_err(|e| {
        IssuerError::PrivateKeyDecode(format!("error decoding private key PEM block: {e}"))
    })?;

    let (format, block) = pems
        .iter()
        .find_map(|p| PrivateKeyFormat::from_pem_tag(p.tag()).map(|f| (f, p)))
        .ok_or_else(|| IssuerError::PrivateKeyDecode("no private key PEM block found".into()))?;

    let der = block.contents();
    match format {
        PrivateKeyFormat::Pkcs8 => check_pkcs8(der)?,
        PrivateKeyFormat::Pkcs1 => {
            RsaKeyPair::from_der(der).map_err(|e| {
                IssuerError::PrivateKeyDecode(format!("error parsing PKCS#1 private key: {e}"))
            })?;
        }
        PrivateKeyFormat::Sec1 => check_sec1(der)?,
    }

    Ok(PrivateKey::new(format, der.to_vec()))
}

/// Accept a PKCS#8 document that loads as any supported key type.
fn check_pkcs8(der: &[u8]) -> Result<()> {
    let rng = SystemRandom::new();
    let ecdsa = [
        &signature::ECDSA_P256_SHA256_ASN1_SIGNING,
        &signature::ECDSA_P384_SHA384_ASN1_SIGNING,
    ];

    let loads = ecdsa
        .into_iter()
        .any(|alg| EcdsaKeyPair::from_pkcs8(alg, der, &rng).is_ok())
        || Ed25519KeyPair::from_pkcs8_maybe_unchecked(der).is_ok()
        || RsaKeyPair::from_pkcs8(der).is_ok();

    if loads {
        Ok(())
    } else {
        Err(IssuerError::PrivateKeyDecode(
            "error parsing PKCS#8 private key: unsupported or malformed key".into(),
        ))
    }
}

/// Check the `ECPrivateKey` structure of RFC 5915.
fn check_sec1(der: &[u8]) -> Result<()> {
    let invalid = |reason: &str| {
        IssuerError::PrivateKeyDecode(format!("error parsing SEC1 private key: {reason}"))
    };

    let (rest, obj) = parse_der(der).map_err(|e| invalid(&e.to_string()))?;
    if !rest.is_empty() {
        return Err(invalid("trailing data after key"));
    }
    let fields = obj.as_sequence().map_err(|_| invalid("not a DER sequence"))?;

    if fields.first().and_then(|v| v.as_u32().ok()) != Some(1) {
        return Err(invalid("unsupported version"));
    }
    match fields.get(1).map(|f| &f.content) {
        Some(BerObjectContent::OctetString(scalar))
            if SEC1_SCALAR_LENGTHS.contains(&scalar.len()) =>
        {
            Ok(())
        }
        _ => Err(invalid("missing or malformed private scalar")),
    }
}

/// Parse a single DER-encoded X.509 certificate.
fn parse_x509_der(der: &[u8]) -> Result<SigningCertificate> {
    let (_, cert) = x509_parser::parse_x509_certificate(der).map_err(|e| {
        IssuerError::CertificateDecode(format!("error parsing x509 certificate: {e}"))
    })?;

    // Missing or unreadable basic constraints mean "not a CA".
    let is_ca = cert
        .basic_constraints()
        .ok()
        .flatten()
        .is_some_and(|ext| ext.value.ca);

    Ok(SigningCertificate {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        serial: cert.raw_serial_as_string(),
        not_before: asn1_to_utc(cert.validity().not_before),
        not_after: asn1_to_utc(cert.validity().not_after),
        fingerprint: sha256_hex(der),
        is_ca,
    })
}

/// Lowercase hex SHA-256 of raw bytes.
fn sha256_hex(data: &[u8]) -> String {
    let digest = ring::digest::digest(&SHA256, data);
    hex::encode(digest.as_ref())
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: x509_parser::time::ASN1Time) -> DateTime<Utc> {
    Utc.timestamp_opt(t.timestamp(), 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn decodes_ca_certificate() {
        let (cert_pem, _) = testutil::ca_keypair_pem("Test Signing CA");
        let cert = decode_certificate_pem(cert_pem.as_bytes()).unwrap();

        assert!(cert.is_ca);
        assert!(cert.subject.contains("Test Signing CA"));
        assert_eq!(cert.fingerprint.len(), 64);
        assert!(cert.not_before < Utc::now() && Utc::now() < cert.not_after);
    }

    #[test]
    fn decodes_leaf_certificate_as_not_ca() {
        let (cert_pem, _) = testutil::leaf_keypair_pem("leaf.example.com");
        let cert = decode_certificate_pem(cert_pem.as_bytes()).unwrap();
        assert!(!cert.is_ca);
    }

    #[test]
    fn first_certificate_in_bundle_wins() {
        let (leaf, _) = testutil::leaf_keypair_pem("leaf.example.com");
        let (ca, _) = testutil::ca_keypair_pem("Bundle CA");
        let bundle = format!("{leaf}\n{ca}");

        let cert = decode_certificate_pem(bundle.as_bytes()).unwrap();
        assert!(!cert.is_ca);
    }

    #[test]
    fn rejects_non_pem_certificate() {
        let err = decode_certificate_pem(b"definitely not pem").unwrap_err();
        assert!(matches!(err, IssuerError::CertificateDecode(_)));
    }

    #[test]
    fn rejects_key_where_certificate_expected() {
        let (_, key_pem) = testutil::ca_keypair_pem("Test CA");
        let err = decode_certificate_pem(key_pem.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no CERTIFICATE PEM block"));
    }

    #[test]
    fn rejects_garbage_der_in_certificate_block() {
        let block = pem::Pem::new("CERTIFICATE", vec![0x30, 0x03, 0x01, 0x01, 0xff]);
        let err = decode_certificate_pem(pem::encode(&block).as_bytes()).unwrap_err();
        assert!(err.to_string().contains("error parsing x509 certificate"));
    }

    #[test]
    fn decodes_pkcs8_private_key() {
        let (_, key_pem) = testutil::ca_keypair_pem("Test CA");
        let key = decode_private_key_pem(key_pem.as_bytes()).unwrap();
        assert_eq!(key.format(), PrivateKeyFormat::Pkcs8);
        assert!(!key.der().is_empty());
    }

    #[test]
    fn rejects_certificate_where_key_expected() {
        let (cert_pem, _) = testutil::ca_keypair_pem("Test CA");
        let err = decode_private_key_pem(cert_pem.as_bytes()).unwrap_err();
        assert!(matches!(err, IssuerError::PrivateKeyDecode(_)));
    }

    #[test]
    fn rejects_truncated_private_key() {
        let block = pem::Pem::new("EC PRIVATE KEY", vec![0x30, 0x10, 0x02]);
        let err = decode_private_key_pem(pem::encode(&block).as_bytes()).unwrap_err();
        assert!(matches!(err, IssuerError::PrivateKeyDecode(_)));
    }

    #[test]
    fn rejects_empty_pkcs8_sequence() {
        let block = pem::Pem::new("PRIVATE KEY", vec![0x30, 0x00]);
        let err = decode_private_key_pem(pem::encode(&block).as_bytes()).unwrap_err();
        assert!(err.to_string().contains("PKCS#8"));
    }

    #[test]
    fn rejects_rsa_key_without_components() {
        let block = pem::Pem::new("RSA PRIVATE KEY", vec![0x30, 0x03, 0x02, 0x01, 0x00]);
        let err = decode_private_key_pem(pem::encode(&block).as_bytes()).unwrap_err();
        assert!(err.to_string().contains("PKCS#1"));
    }

    #[test]
    fn rejects_sec1_key_without_scalar() {
        let block = pem::Pem::new("EC PRIVATE KEY", vec![0x30, 0x03, 0x02, 0x01, 0x01]);
        let err = decode_private_key_pem(pem::encode(&block).as_bytes()).unwrap_err();
        assert!(err.to_string().contains("private scalar"));
    }

    #[test]
    fn accepts_sec1_p256_key() {
        let mut der = vec![0x30, 0x25, 0x02, 0x01, 0x01, 0x04, 0x20];
        der.extend_from_slice(&[0x42; 32]);
        let block = pem::Pem::new("EC PRIVATE KEY", der);

        let key = decode_private_key_pem(pem::encode(&block).as_bytes()).unwrap();
        assert_eq!(key.format(), PrivateKeyFormat::Sec1);
    }
}
