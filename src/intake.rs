use crate::cert::{CertificateParser, ParsedCertificate, SerialNumber};
use crate::signer::{ResponseSigner, SignRequest};
use crate::store::records::{is_valid_reason, CertStatus, CertificateRecord, OcspRecord};
use crate::store::Accessor;
use crate::utils::errors::{OcspCacheError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

/// A certificate-addition request. Absent fields deserialize to their
/// empty values so the validation sequence, not the JSON decoder, reports
/// what is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddCertificateRequest {
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub authority_key_identifier: String,
    #[serde(default)]
    pub ca_label: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: i32,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pem: String,
}

/// Validates certificate-addition requests, cross-checks them against the
/// certificate they carry, and persists the resulting records. When a
/// signer is configured an initial signed response is persisted alongside
/// the certificate record.
pub struct IntakeValidator {
    store: Arc<dyn Accessor>,
    signer: Option<Arc<dyn ResponseSigner>>,
}

impl IntakeValidator {
    pub fn new(store: Arc<dyn Accessor>, signer: Option<Arc<dyn ResponseSigner>>) -> Self {
        Self { store, signer }
    }

    /// Run the full intake pipeline. Client errors report the first
    /// violated rule; nothing is persisted unless every rule passes.
    pub async fn process(&self, request: AddCertificateRequest) -> Result<()> {
        // The store key is the validated serial, which keeps the client's
        // own form (lowercased, colons stripped).
        let (status, certificate, serial) = Self::validate(&request)?;
        let authority_key_id = request.authority_key_identifier.to_lowercase();

        let record = CertificateRecord {
            serial: serial.clone(),
            authority_key_id: authority_key_id.clone(),
            ca_label: request.ca_label.clone(),
            status,
            reason: request.reason,
            expiry: request.expiry.unwrap_or(certificate.not_after),
            revoked_at: request.revoked_at,
            raw_certificate: request.pem.clone(),
        };

        self.store.insert_certificate(record).await?;
        tracing::info!(
            "Accepted certificate {} (AKI {}, status {})",
            serial,
            authority_key_id,
            status
        );

        // Initial response. A failure here leaves the certificate record
        // behind and must reach the caller, not the log alone.
        if let Some(signer) = &self.signer {
            let signed = signer
                .sign(SignRequest {
                    certificate,
                    status,
                    reason: request.reason,
                    revoked_at: request.revoked_at,
                })
                .await?;

            self.store
                .insert_ocsp(OcspRecord {
                    serial: serial.clone(),
                    authority_key_id,
                    body: signed.body,
                    expiry: signed.next_update,
                })
                .await?;
            tracing::debug!("Signed initial response for {}", serial);
        }

        Ok(())
    }

    /// The validation sequence. Fails closed; the first violated rule wins.
    /// On success the request's serial is returned in validated form.
    fn validate(
        request: &AddCertificateRequest,
    ) -> Result<(CertStatus, ParsedCertificate, SerialNumber)> {
        if request.serial_number.is_empty() {
            return Err(OcspCacheError::InvalidRequest(
                "serial_number is required".to_string(),
            ));
        }

        if request.authority_key_identifier.is_empty() {
            return Err(OcspCacheError::InvalidRequest(
                "authority_key_identifier is required".to_string(),
            ));
        }

        let status = CertStatus::from_str(&request.status)
            .map_err(OcspCacheError::InvalidRequest)?;

        if status == CertStatus::Revoked {
            let revoked_at_set = request
                .revoked_at
                .is_some_and(|t| t.timestamp() != 0);
            if !revoked_at_set {
                return Err(OcspCacheError::InvalidRequest(
                    "revoked_at is required for revoked certificates".to_string(),
                ));
            }
        }

        if !is_valid_reason(request.reason) {
            return Err(OcspCacheError::InvalidRequest(format!(
                "Invalid revocation reason code: {}",
                request.reason
            )));
        }

        if request.pem.is_empty() {
            return Err(OcspCacheError::InvalidRequest(
                "pem is required".to_string(),
            ));
        }

        let certificate = CertificateParser::parse_pem(&request.pem)?;

        // Serial comparison is numeric, so equivalent hex forms with
        // different casing or zero padding are accepted.
        let request_serial = SerialNumber::parse(&request.serial_number).map_err(|e| {
            OcspCacheError::InvalidRequest(format!("serial_number is not base-16: {e}"))
        })?;
        if request_serial.to_bytes_be() != certificate.serial_bytes {
            return Err(OcspCacheError::InvalidRequest(format!(
                "serial_number {} does not match the certificate serial {}",
                request_serial, certificate.serial
            )));
        }

        let request_aki = hex::decode(&request.authority_key_identifier).map_err(|e| {
            OcspCacheError::InvalidRequest(format!(
                "authority_key_identifier is not hex-encoded: {e}"
            ))
        })?;
        if request_aki != certificate.authority_key_id {
            return Err(OcspCacheError::InvalidRequest(
                "authority_key_identifier does not match the certificate".to_string(),
            ));
        }

        Ok((status, certificate, request_serial))
    }
}
