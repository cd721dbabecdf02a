//! Shared fixtures for the in-file test modules.

use crate::signer::{ResponseSigner, SignRequest, SignedResponse};
use crate::utils::errors::{OcspCacheError, Result};
use async_trait::async_trait;

/// Self-signed RSA certificate with serial 0x1a2b (6699 decimal) and an
/// authority key identifier extension, valid until 2046.
pub const TEST_CERT_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIDPzCCAiegAwIBAgICGiswDQYJKoZIhvcNAQELBQAwODEaMBgGA1UECgwRU3Rh
dHVzIENhY2hlIFRlc3QxGjAYBgNVBAMMEXN0YXR1cy1jYWNoZS10ZXN0MB4XDTI2
MDgzMTAwMTAwOFoXDTQ2MDgyNjAwMTAwOFowODEaMBgGA1UECgwRU3RhdHVzIENh
Y2hlIFRlc3QxGjAYBgNVBAMMEXN0YXR1cy1jYWNoZS10ZXN0MIIBIjANBgkqhkiG
9w0BAQEFAAOCAQ8AMIIBCgKCAQEAknHJ0OBb2S724t8XJuIbwn2W05GDs/eTRp3V
kCIL4R8D5wCDV49XHyMmGAjRaxLPqt7IF2bNi3uquFdtwQDHd4UY17l3xKTLlj5e
6tHPuQjgCiImVkHNiXBD1Ws/uWjQx9MNI++aNTFSYdz/QK9E3m0vDOg8TaFsvsDn
cGDvYWq+iTlLauv/HxrBTomij5QWFCGc1IQWsCD4vM0ug0eXBsvi0UKP2v1GzKfQ
+GUHeh6QEklC9Ctr/BNZE+Ob1ZnDEhPnCtiNzx/CLfway0LqQoz4+Moa02613llx
STY/qLBeNdQzF7qwbRnU+DQZ80LnTU4S8eU6pB8oSvsu/yGn8wIDAQABo1MwUTAP
BgNVHRMBAf8EBTADAQH/MB0GA1UdDgQWBBS6NbxnRPVqa4js+srhCC5atXst4DAf
BgNVHSMEGDAWgBS6NbxnRPVqa4js+srhCC5atXst4DANBgkqhkiG9w0BAQsFAAOC
AQEAJePqaW0o7aszr+/5fCERRIiMBdl0TBMRNYI/wGiRsHT1Y4dHBXjIMzFb6ZM+
ybYzi6bigAXPwxZMXZ7ennG9rdH3h18Cfub8uCTj7ooW/8kRfP1OFeX9UbnkBLKY
enEGkpppXXj/MCi9J00Bs87aLH46A+F27+F2QZyuWYnlznMSBWeW4TUh9v1A4M8A
6oV70n0RY1e11HqQ0V3vA9VyylcIujvUSvLyNUwa4gcFTvU2Od6BnZKVzeYOb4mp
uedCxJhfq8IpQIt45Jjm/sVdrZA2pxQfIynjknKcE9gSZem1mMqNM5QFCzlCEwA/
bsvTo62zEMWt+LH1H8M0UvnVQA==
-----END CERTIFICATE-----
";

/// Hex form of TEST_CERT_PEM's authority key identifier.
pub const TEST_CERT_AKI_HEX: &str = "ba35bc6744f56a6b88ecfacae1082e5ab57b2de0";

/// TEST_CERT_PEM's notAfter as a unix timestamp (2046-08-26T00:10:08Z).
pub const TEST_CERT_NOT_AFTER: i64 = 2418855008;

/// Signer that always fails, for exercising the fatal-error paths.
pub struct FailingSigner;

#[async_trait]
impl ResponseSigner for FailingSigner {
    async fn sign(&self, _request: SignRequest) -> Result<SignedResponse> {
        Err(OcspCacheError::Signing("signer unavailable".to_string()))
    }
}
