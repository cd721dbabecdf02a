use crate::cert::SerialNumber;
use crate::store::Accessor;
use std::sync::Arc;

/// Answers point queries for the freshest signed response of a certificate
/// identity. Ordering between generations is carried entirely by the
/// expiry-max selection rule, so lookups never coordinate with the
/// refresher.
pub struct LookupSource {
    store: Arc<dyn Accessor>,
}

impl LookupSource {
    pub fn new(store: Arc<dyn Accessor>) -> Self {
        Self { store }
    }

    /// Return the body of the current signed response for the identity
    /// named by `issuer_key_hash` and `serial`, or `None`.
    ///
    /// An absent serial, an unknown identity and a store failure all look
    /// identical to the caller; the store failure is logged.
    pub async fn respond(
        &self,
        issuer_key_hash: &[u8],
        serial: Option<&SerialNumber>,
    ) -> Option<Vec<u8>> {
        let serial = serial?;
        let authority_key_id = hex::encode(issuer_key_hash);

        let records = match self.store.get_ocsp(serial, &authority_key_id).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "Lookup for {} ({}) failed: {}",
                    serial,
                    authority_key_id,
                    e
                );
                return None;
            }
        };

        // The record with the maximum expiry is the current generation;
        // the refresher only ever moves expiry forward.
        records
            .into_iter()
            .max_by_key(|record| record.expiry)
            .map(|record| record.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::records::OcspRecord;
    use crate::store::FileStore;
    use chrono::{Duration, Utc};

    const AKI_BYTES: [u8; 4] = [0x2a, 0x2a, 0x2a, 0x2a];

    fn record(body: &[u8], expiry: chrono::DateTime<Utc>) -> OcspRecord {
        OcspRecord {
            serial: SerialNumber::new("1a2b"),
            authority_key_id: hex::encode(AKI_BYTES),
            body: body.to_vec(),
            expiry,
        }
    }

    #[tokio::test]
    async fn test_absent_serial_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let source = LookupSource::new(store);

        assert!(source.respond(&AKI_BYTES, None).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_identity_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let source = LookupSource::new(store);

        let serial = SerialNumber::new("1a2b");
        assert!(source.respond(&AKI_BYTES, Some(&serial)).await.is_none());
    }

    #[tokio::test]
    async fn test_latest_expiry_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let now = Utc::now();

        store
            .insert_ocsp(record(b"older", now + Duration::hours(1)))
            .await
            .unwrap();
        store
            .insert_ocsp(record(b"newer", now + Duration::hours(2)))
            .await
            .unwrap();

        let source = LookupSource::new(store);
        let serial = SerialNumber::new("1a2b");
        let body = source.respond(&AKI_BYTES, Some(&serial)).await.unwrap();
        assert_eq!(body, b"newer".to_vec());
    }

    #[tokio::test]
    async fn test_serial_found_regardless_of_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let now = Utc::now();

        // Newest generation inserted first
        store
            .insert_ocsp(record(b"newest", now + Duration::hours(3)))
            .await
            .unwrap();
        store
            .insert_ocsp(record(b"stale", now - Duration::hours(3)))
            .await
            .unwrap();
        store
            .insert_ocsp(record(b"middle", now + Duration::hours(1)))
            .await
            .unwrap();

        let source = LookupSource::new(store);
        let serial = SerialNumber::new("1a2b");
        let body = source.respond(&AKI_BYTES, Some(&serial)).await.unwrap();
        assert_eq!(body, b"newest".to_vec());
    }

    #[tokio::test]
    async fn test_intake_round_trip() {
        use crate::intake::{AddCertificateRequest, IntakeValidator};
        use crate::signer::{DigestSigner, ResponseSigner};
        use crate::testutil::{TEST_CERT_AKI_HEX, TEST_CERT_PEM};

        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let signer: Arc<dyn ResponseSigner> = Arc::new(DigestSigner::new(Duration::hours(4)));

        IntakeValidator::new(store.clone(), Some(signer))
            .process(AddCertificateRequest {
                serial_number: "1a2b".to_string(),
                authority_key_identifier: TEST_CERT_AKI_HEX.to_string(),
                ca_label: "test-ca".to_string(),
                status: "good".to_string(),
                reason: 0,
                expiry: None,
                revoked_at: None,
                pem: TEST_CERT_PEM.to_string(),
            })
            .await
            .unwrap();

        // Query with the issuer key hash as raw bytes, serial 0x1a2b
        let issuer_key_hash = hex::decode(TEST_CERT_AKI_HEX).unwrap();
        let serial = SerialNumber::new("1a2b");
        let body = LookupSource::new(store)
            .respond(&issuer_key_hash, Some(&serial))
            .await
            .unwrap();
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn test_issuer_key_hash_is_hex_encoded_for_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        store
            .insert_ocsp(record(b"body", Utc::now() + Duration::hours(1)))
            .await
            .unwrap();

        let source = LookupSource::new(store);
        let serial = SerialNumber::new("1a2b");
        // Same bytes, found; different issuer key hash, not found.
        assert!(source.respond(&AKI_BYTES, Some(&serial)).await.is_some());
        assert!(source
            .respond(&[0x07, 0x07], Some(&serial))
            .await
            .is_none());
    }
}
