use crate::cert::SerialNumber;
use crate::utils::errors::{OcspCacheError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use x509_parser::der_parser::oid;
use x509_parser::prelude::*;

// X.509 Extension OIDs
const AUTHORITY_KEY_IDENTIFIER_OID: oid::Oid = oid!(2.5.29 .35);

/// The certificate fields the status cache needs: the identity used as the
/// store key plus the certificate's own expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCertificate {
    /// Serial number as a big-endian integer, leading zeros stripped.
    pub serial_bytes: Vec<u8>,
    /// Serial number in the hex form used for store keys.
    pub serial: SerialNumber,
    /// Raw bytes of the authority key identifier extension's key id.
    pub authority_key_id: Vec<u8>,
    /// notAfter
    pub not_after: DateTime<Utc>,
}

pub struct CertificateParser;

impl CertificateParser {
    /// Parse a PEM-encoded certificate into the fields the cache keys on.
    pub fn parse_pem(pem_data: &str) -> Result<ParsedCertificate> {
        // Extract the base64 content from PEM
        let cert_data = Self::extract_cert_from_pem(pem_data)?;

        // Decode base64
        let der_bytes = general_purpose::STANDARD
            .decode(&cert_data)
            .map_err(|e| OcspCacheError::CertParsing(format!("Base64 decode error: {e}")))?;

        // Parse DER certificate
        let (_, cert) = X509Certificate::from_der(&der_bytes)
            .map_err(|e| OcspCacheError::CertParsing(format!("DER parsing error: {e}")))?;

        Self::extract_fields(&cert)
    }

    /// Extract certificate data from PEM format
    fn extract_cert_from_pem(pem_data: &str) -> Result<String> {
        let mut in_cert = false;
        let mut cert_lines = Vec::new();

        for line in pem_data.lines() {
            let line = line.trim();
            if line == "-----BEGIN CERTIFICATE-----" {
                in_cert = true;
                continue;
            } else if line == "-----END CERTIFICATE-----" {
                break;
            } else if in_cert {
                cert_lines.push(line);
            }
        }

        if cert_lines.is_empty() {
            return Err(OcspCacheError::CertParsing(
                "No certificate data found in PEM".to_string(),
            ));
        }

        Ok(cert_lines.join(""))
    }

    fn extract_fields(cert: &X509Certificate) -> Result<ParsedCertificate> {
        let serial_bytes = cert.serial.to_bytes_be();
        let serial = SerialNumber::new(&hex::encode(&serial_bytes));

        // Extract the authority key identifier. Certificates without one
        // cannot be keyed by issuer and are rejected.
        let mut authority_key_id = None;
        for ext in cert.extensions() {
            if ext.oid == AUTHORITY_KEY_IDENTIFIER_OID {
                if let Ok((_rem, aki)) = AuthorityKeyIdentifier::from_der(ext.value) {
                    authority_key_id = aki.key_identifier.map(|kid| kid.0.to_vec());
                }
                break;
            }
        }
        let authority_key_id = authority_key_id.ok_or_else(|| {
            OcspCacheError::CertParsing(
                "Certificate has no authority key identifier".to_string(),
            )
        })?;

        let not_after = DateTime::from_timestamp(cert.validity().not_after.timestamp(), 0)
            .unwrap_or_else(Utc::now);

        Ok(ParsedCertificate {
            serial_bytes,
            serial,
            authority_key_id,
            not_after,
        })
    }
}
