use crate::cert::ParsedCertificate;
use crate::store::records::CertStatus;
use crate::utils::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

/// A status assertion to be signed for one certificate.
#[derive(Debug, Clone)]
pub struct SignRequest {
    pub certificate: ParsedCertificate,
    pub status: CertStatus,
    pub reason: i32,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// A signed OCSP response blob together with the validity window the signer
/// embedded in it.
#[derive(Debug, Clone)]
pub struct SignedResponse {
    pub body: Vec<u8>,
    /// The response's own nextUpdate time; intake uses this as the initial
    /// record expiry.
    pub next_update: DateTime<Utc>,
}

/// Produces signed OCSP response blobs. Real cryptographic signing lives
/// outside this crate; implementations only need to return the opaque body
/// and its validity window.
#[async_trait]
pub trait ResponseSigner: Send + Sync {
    async fn sign(&self, request: SignRequest) -> Result<SignedResponse>;
}

/// Deterministic non-cryptographic signer for local runs and tests: the
/// body is a SHA-256 digest over the assertion fields and the nextUpdate
/// instant, so every generation yields a distinct non-empty blob.
pub struct DigestSigner {
    validity: Duration,
}

impl DigestSigner {
    pub fn new(validity: Duration) -> Self {
        Self { validity }
    }
}

#[async_trait]
impl ResponseSigner for DigestSigner {
    async fn sign(&self, request: SignRequest) -> Result<SignedResponse> {
        let next_update = Utc::now() + self.validity;

        let mut hasher = Sha256::new();
        hasher.update(request.certificate.serial.as_hex().as_bytes());
        hasher.update(&request.certificate.authority_key_id);
        hasher.update(request.status.to_string().as_bytes());
        hasher.update(request.reason.to_be_bytes());
        if let Some(revoked_at) = request.revoked_at {
            hasher.update(revoked_at.timestamp().to_be_bytes());
        }
        hasher.update(next_update.timestamp_micros().to_be_bytes());

        Ok(SignedResponse {
            body: hasher.finalize().to_vec(),
            next_update,
        })
    }
}
