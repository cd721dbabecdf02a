pub mod file;
pub mod records;

pub use file::FileStore;
pub use records::{CertificateRecord, CertStatus, OcspRecord};

use crate::cert::SerialNumber;
use crate::utils::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable keyed storage for certificate records and OCSP response
/// records. The store is the only shared mutable resource; it must give
/// read-your-writes consistency per key, and `upsert_ocsp` must be atomic
/// with respect to concurrent readers.
#[async_trait]
pub trait Accessor: Send + Sync {
    /// Insert a certificate record. The record is created exactly once per
    /// `(serial, authority_key_id)` identity.
    async fn insert_certificate(&self, record: CertificateRecord) -> Result<()>;

    /// Insert a new OCSP response generation for an identity.
    async fn insert_ocsp(&self, record: OcspRecord) -> Result<()>;

    /// Replace the identity's current response generation (the one with
    /// the latest expiry), or insert one when none exists.
    async fn upsert_ocsp(
        &self,
        serial: &SerialNumber,
        authority_key_id: &str,
        body: Vec<u8>,
        expiry: DateTime<Utc>,
    ) -> Result<()>;

    /// All OCSP response generations for an identity, in no particular
    /// order.
    async fn get_ocsp(
        &self,
        serial: &SerialNumber,
        authority_key_id: &str,
    ) -> Result<Vec<OcspRecord>>;

    /// All certificate records not yet past their own expiry.
    async fn get_unexpired_certificates(&self) -> Result<Vec<CertificateRecord>>;
}
