//! Redacted certificate facts for pinned web-service certificates.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::warn;
use x509_parser::parse_x509_certificate;

/// Produces display facts for a PEM-encoded certificate.
///
/// Implementations must never include key material or the encoded certificate itself.
pub trait CertificateInspector: Send + Sync {
    /// Describe one certificate as a flat string map.
    fn describe(&self, pem: &str) -> BTreeMap<String, String>;
}

/// Inspector backed by `x509-parser`.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509Inspector;

/// Facts extracted from a parsed certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateFacts {
    /// Subject distinguished name.
    pub subject: String,
    /// Issuer distinguished name.
    pub issuer: String,
    /// Serial number as colon-separated hex.
    pub serial: String,
    /// Start of the validity window (RFC 3339).
    pub issue_date: String,
    /// End of the validity window (RFC 3339).
    pub expire_date: String,
    /// SHA-256 fingerprint of the DER encoding.
    pub sha256_hash: String,
}

impl X509Inspector {
    /// Parse a PEM certificate into its redacted facts.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the input is not a PEM-encoded X.509 certificate.
    pub fn inspect(pem_text: &str) -> Result<CertificateFacts, String> {
        let block = pem::parse(pem_text.trim()).map_err(|err| format!("invalid PEM: {err}"))?;
        if block.tag() != "CERTIFICATE" {
            return Err(format!("unexpected PEM block '{}'", block.tag()));
        }
        let der = block.contents();
        let (_, cert) =
            parse_x509_certificate(der).map_err(|err| format!("invalid certificate: {err}"))?;
        let validity = cert.validity();
        Ok(CertificateFacts {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial: cert.raw_serial_as_string(),
            issue_date: rfc3339(validity.not_before.timestamp()),
            expire_date: rfc3339(validity.not_after.timestamp()),
            sha256_hash: fingerprint(der),
        })
    }
}

impl CertificateInspector for X509Inspector {
    fn describe(&self, pem: &str) -> BTreeMap<String, String> {
        match Self::inspect(pem) {
            Ok(facts) => BTreeMap::from([
                ("subject".to_string(), facts.subject),
                ("issuer".to_string(), facts.issuer),
                ("serial".to_string(), facts.serial),
                ("issueDate".to_string(), facts.issue_date),
                ("expireDate".to_string(), facts.expire_date),
                ("sha256Hash".to_string(), facts.sha256_hash),
            ]),
            Err(reason) => {
                warn!(error = %reason, "unable to inspect pinned certificate");
                BTreeMap::from([("error".to_string(), reason)])
            }
        }
    }
}

fn rfc3339(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map_or_else(|| timestamp.to_string(), |instant| instant.to_rfc3339())
}

fn fingerprint(der: &[u8]) -> String {
    Sha256::digest(der)
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}
