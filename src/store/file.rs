use crate::cert::SerialNumber;
use crate::store::records::{CertificateRecord, OcspRecord};
use crate::store::Accessor;
use crate::utils::errors::{OcspCacheError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const CERTIFICATES_FILE: &str = "certificates.json";
const OCSP_FILE: &str = "ocsp.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CertificateTable(HashMap<String, CertificateRecord>);

#[derive(Debug, Default, Serialize, Deserialize)]
struct OcspTable(HashMap<String, Vec<OcspRecord>>);

struct StoreState {
    certificates: CertificateTable,
    responses: OcspTable,
}

/// JSON-document store implementing [`Accessor`]. State is held in memory
/// and written back to disk on every mutation, so readers always observe a
/// whole generation, never a partial write.
pub struct FileStore {
    store_dir: PathBuf,
    state: RwLock<StoreState>,
}

fn identity_key(serial: &SerialNumber, authority_key_id: &str) -> String {
    format!("{}:{}", serial.as_hex(), authority_key_id)
}

impl FileStore {
    /// Open (or create) a store rooted at `store_dir`.
    pub fn open(store_dir: impl AsRef<Path>) -> Result<Self> {
        let store_dir = store_dir.as_ref().to_path_buf();
        fs::create_dir_all(&store_dir)?;

        let certificates = Self::load_table(&store_dir.join(CERTIFICATES_FILE))?;
        let responses = Self::load_table(&store_dir.join(OCSP_FILE))?;

        Ok(Self {
            store_dir,
            state: RwLock::new(StoreState {
                certificates,
                responses,
            }),
        })
    }

    /// Load one table file, starting empty when the file is missing or
    /// corrupt. A corrupt table is renamed aside rather than deleted.
    fn load_table<T: Default + for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path)?;
        match serde_json::from_str::<T>(&content) {
            Ok(table) => Ok(table),
            Err(e) => {
                tracing::warn!(
                    "Store table {} is corrupt ({}); starting empty",
                    path.display(),
                    e
                );
                let aside = path.with_extension("json.corrupt");
                if let Err(rename_err) = fs::rename(path, &aside) {
                    tracing::error!("Failed to move corrupt table aside: {}", rename_err);
                }
                Ok(T::default())
            }
        }
    }

    fn save_table<T: Serialize>(&self, file_name: &str, table: &T) -> Result<()> {
        let path = self.store_dir.join(file_name);
        let content = serde_json::to_string_pretty(table)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[async_trait]
impl Accessor for FileStore {
    async fn insert_certificate(&self, record: CertificateRecord) -> Result<()> {
        let key = identity_key(&record.serial, &record.authority_key_id);

        let mut state = self
            .state
            .write()
            .map_err(|_| OcspCacheError::Storage("Store lock poisoned".to_string()))?;

        if state.certificates.0.contains_key(&key) {
            return Err(OcspCacheError::Storage(format!(
                "Certificate record already exists: {key}"
            )));
        }

        state.certificates.0.insert(key.clone(), record);
        self.save_table(CERTIFICATES_FILE, &state.certificates)?;
        tracing::debug!("Inserted certificate record {}", key);
        Ok(())
    }

    async fn insert_ocsp(&self, record: OcspRecord) -> Result<()> {
        let key = identity_key(&record.serial, &record.authority_key_id);

        let mut state = self
            .state
            .write()
            .map_err(|_| OcspCacheError::Storage("Store lock poisoned".to_string()))?;

        state.responses.0.entry(key.clone()).or_default().push(record);
        self.save_table(OCSP_FILE, &state.responses)?;
        tracing::debug!("Inserted OCSP record for {}", key);
        Ok(())
    }

    async fn upsert_ocsp(
        &self,
        serial: &SerialNumber,
        authority_key_id: &str,
        body: Vec<u8>,
        expiry: DateTime<Utc>,
    ) -> Result<()> {
        let key = identity_key(serial, authority_key_id);

        let mut state = self
            .state
            .write()
            .map_err(|_| OcspCacheError::Storage("Store lock poisoned".to_string()))?;

        let generations = state.responses.0.entry(key.clone()).or_default();
        // Replace the current generation in place; older stale generations
        // stay behind and lose the max-expiry race naturally.
        match generations.iter_mut().max_by_key(|r| r.expiry) {
            Some(current) => {
                current.body = body;
                current.expiry = expiry;
            }
            None => generations.push(OcspRecord {
                serial: serial.clone(),
                authority_key_id: authority_key_id.to_string(),
                body,
                expiry,
            }),
        }

        self.save_table(OCSP_FILE, &state.responses)?;
        tracing::debug!("Upserted OCSP record for {} (expiry {})", key, expiry);
        Ok(())
    }

    async fn get_ocsp(
        &self,
        serial: &SerialNumber,
        authority_key_id: &str,
    ) -> Result<Vec<OcspRecord>> {
        let key = identity_key(serial, authority_key_id);

        let state = self
            .state
            .read()
            .map_err(|_| OcspCacheError::Storage("Store lock poisoned".to_string()))?;

        Ok(state.responses.0.get(&key).cloned().unwrap_or_default())
    }

    async fn get_unexpired_certificates(&self) -> Result<Vec<CertificateRecord>> {
        let state = self
            .state
            .read()
            .map_err(|_| OcspCacheError::Storage("Store lock poisoned".to_string()))?;

        let now = Utc::now();
        Ok(state
            .certificates
            .0
            .values()
            .filter(|record| !record.is_expired(now))
            .cloned()
            .collect())
    }
}
