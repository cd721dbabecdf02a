pub mod parser;
pub mod serial;

pub use parser::{CertificateParser, ParsedCertificate};
pub use serial::SerialNumber;
