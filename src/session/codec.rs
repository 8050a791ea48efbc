//! Base64 transport encoding for signed cookie values.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use super::signer::{Signer, Verification};
use crate::SecretString;

/// Standard alphabet, padded on encode, padding optional on decode.
const COOKIE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Turns a payload into an opaque cookie value and back.
///
/// ```rust
/// use draconic::{CookieCodec, SecretString};
///
/// let codec = CookieCodec::new(SecretString::new("s3cr3t"));
/// let value = codec.encode("42");
/// assert_eq!(codec.decode(&value).into_payload().as_deref(), Some("42"));
/// ```
#[derive(Debug, Clone)]
pub struct CookieCodec {
    signer: Signer,
}

impl CookieCodec {
    pub fn new(secret: SecretString) -> Self {
        Self {
            signer: Signer::new(secret),
        }
    }

    pub fn encode(&self, value: &str) -> String {
        COOKIE_BASE64.encode(self.signer.sign(value))
    }

    pub fn decode(&self, cookie_value: &str) -> Verification {
        let Ok(bytes) = COOKIE_BASE64.decode(cookie_value) else {
            return Verification::Invalid;
        };
        let Ok(signed) = String::from_utf8(bytes) else {
            return Verification::Invalid;
        };
        self.signer.unsign(&signed)
    }
}
