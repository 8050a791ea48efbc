//! HMAC-SHA256 signing of cookie payloads.
//!
//! A signed value has the form `{payload}:{mac}` where `mac` is the standard
//! base64 encoding of `HMAC-SHA256(secret, payload)` with the `=` padding
//! removed. The payload may itself contain `:`; the mac never does.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::SecretString;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = ':';

/// Outcome of checking a signed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The mac matched; holds the original payload.
    Verified(String),
    /// Missing separator, wrong mac, wrong secret or undecodable input.
    Invalid,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified(_))
    }

    pub fn into_payload(self) -> Option<String> {
        match self {
            Verification::Verified(payload) => Some(payload),
            Verification::Invalid => None,
        }
    }
}

/// Signs values with a fixed secret.
#[derive(Debug, Clone)]
pub struct Signer {
    secret: SecretString,
}

impl Signer {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    pub fn sign(&self, value: &str) -> String {
        sign(value, &self.secret)
    }

    pub fn unsign(&self, signed: &str) -> Verification {
        unsign(signed, &self.secret)
    }
}

/// Returns `{value}:{mac}`.
pub fn sign(value: &str, secret: &SecretString) -> String {
    let mac = compute_hmac(value.as_bytes(), secret.as_bytes());
    format!("{value}{SEPARATOR}{}", STANDARD_NO_PAD.encode(mac))
}

/// Recovers the payload of a value produced by [`sign`].
///
/// The whole presented string is compared against a freshly signed copy of
/// its payload, so any change to either half fails verification.
pub fn unsign(signed: &str, secret: &SecretString) -> Verification {
    let Some((payload, _)) = signed.rsplit_once(SEPARATOR) else {
        return Verification::Invalid;
    };

    let expected = sign(payload, secret);
    if constant_time_eq(expected.as_bytes(), signed.as_bytes()) {
        Verification::Verified(payload.to_owned())
    } else {
        log::warn!(target: "draconic::session", "msg=\"signed value rejected\" prefix=\"{}...\"", payload.chars().take(8).collect::<String>());
        Verification::Invalid
    }
}

/// Computes HMAC-SHA256.
fn compute_hmac(message: &[u8], key: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so `new_from_slice` cannot fail here.
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Slices of different length compare unequal without inspecting content.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
