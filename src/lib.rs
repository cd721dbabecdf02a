pub mod cert;
pub mod cli;
pub mod intake;
pub mod lookup;
pub mod refresh;
pub mod signer;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export specific items to avoid conflicts
pub use cert::{CertificateParser, ParsedCertificate, SerialNumber};
pub use intake::{AddCertificateRequest, IntakeValidator};
pub use lookup::LookupSource;
pub use refresh::Refresher;
pub use signer::{DigestSigner, ResponseSigner, SignRequest, SignedResponse};
pub use store::{Accessor, CertStatus, CertificateRecord, FileStore, OcspRecord};
pub use utils::errors;
