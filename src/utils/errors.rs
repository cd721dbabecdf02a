use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcspCacheError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Certificate parsing error: {0}")]
    CertParsing(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Certificate not found: {0}")]
    CertNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OcspCacheError {
    /// Whether the caller is at fault. Intake reports these as a rejection
    /// of the request rather than a service fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OcspCacheError::InvalidRequest(_) | OcspCacheError::CertParsing(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OcspCacheError>;
