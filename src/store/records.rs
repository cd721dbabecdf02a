use crate::cert::SerialNumber;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Revocation status of a tracked certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertStatus {
    Good,
    Revoked,
    Unknown,
}

impl FromStr for CertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "revoked" => Ok(Self::Revoked),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Invalid certificate status: {s}")),
        }
    }
}

impl fmt::Display for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Good => "good",
            Self::Revoked => "revoked",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// The ten standard OCSP revocation reason codes (RFC 5280 CRLReason).
/// Code 7 is unassigned. Built once; queried read-only.
pub const VALID_REASON_CODES: [i32; 10] = [0, 1, 2, 3, 4, 5, 6, 8, 9, 10];

/// Whether `reason` is one of the standard reason codes. Required for every
/// record, not just revoked ones.
pub fn is_valid_reason(reason: i32) -> bool {
    VALID_REASON_CODES.contains(&reason)
}

/// One tracked certificate. Keyed by `(serial, authority_key_id)`; created
/// once at intake and never deleted by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub serial: SerialNumber,
    /// Hex-encoded issuer key hash.
    pub authority_key_id: String,
    /// Label of the issuing authority configuration that owns this record.
    pub ca_label: String,
    pub status: CertStatus,
    pub reason: i32,
    /// The certificate's own expiration.
    pub expiry: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    /// Original PEM bytes, re-parsed on every refresh cycle.
    pub raw_certificate: String,
}

impl CertificateRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry
    }
}

/// One generation of a signed OCSP response. Generations accumulate; the
/// current one for an identity is the one with the latest expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcspRecord {
    pub serial: SerialNumber,
    pub authority_key_id: String,
    /// Opaque signed response bytes.
    pub body: Vec<u8>,
    /// After this instant the response must no longer be served as
    /// authoritative.
    pub expiry: DateTime<Utc>,
}
