//! Properties of the cookie signing scheme that the session layer relies on.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use draconic::session::{sign, unsign};
use draconic::{CookieCodec, SecretString, Signer, Verification};

const SECRET: &str = "s3cr3t";

fn secret() -> SecretString {
    SecretString::new(SECRET)
}

#[test]
fn test_known_vector() {
    assert_eq!(
        sign("42", &secret()),
        "42:eyU0C2Rjd7hwelXesPCRSb/ZOwdPf62/cxb5ePI2+1M"
    );
    assert_eq!(
        CookieCodec::new(SecretString::new(SECRET)).encode("42"),
        "NDI6ZXlVMEMyUmpkN2h3ZWxYZXNQQ1JTYi9aT3dkUGY2Mi9jeGI1ZVBJMisxTQ=="
    );
}

#[test]
fn test_round_trip_for_assorted_values() {
    for value in ["", "1", "42", "a:b:c", "ünïcödé", "with space", "9223372036854775807"] {
        let signed = sign(value, &secret());
        assert_eq!(
            unsign(&signed, &secret()),
            Verification::Verified(value.to_owned()),
            "{value}"
        );
    }
}

#[test]
fn test_every_single_byte_tamper_is_rejected() {
    let signed = sign("1337", &secret());

    for index in 0..signed.len() {
        let mut bytes = signed.clone().into_bytes();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();
        assert_eq!(
            unsign(&tampered, &secret()),
            Verification::Invalid,
            "tamper at {index}"
        );
    }
}

#[test]
fn test_cross_secret_rejection() {
    let signed = sign("42", &secret());
    assert_eq!(unsign(&signed, &SecretString::new("s3cr3t ")), Verification::Invalid);
    assert_eq!(unsign(&signed, &SecretString::new("S3CR3T")), Verification::Invalid);
    assert_eq!(unsign(&signed, &SecretString::new("")), Verification::Invalid);
}

#[test]
fn test_signature_cannot_be_moved_to_another_payload() {
    let signed = sign("1", &secret());
    let mac = signed.rsplit_once(':').unwrap().1;
    assert_eq!(unsign(&format!("2:{mac}"), &secret()), Verification::Invalid);
}

#[test]
fn test_codec_rejects_mutated_cookie() {
    let codec = CookieCodec::new(SecretString::new(SECRET));
    let encoded = codec.encode("42");

    for index in 0..encoded.len() - 2 {
        let mut bytes = encoded.clone().into_bytes();
        bytes[index] = if bytes[index] == b'Q' { b'R' } else { b'Q' };
        let mutated = String::from_utf8(bytes).unwrap();
        assert_eq!(codec.decode(&mutated), Verification::Invalid, "mutation at {index}");
    }
}

#[test]
fn test_codec_rejects_unsigned_value() {
    let codec = CookieCodec::new(SecretString::new(SECRET));
    let forged = STANDARD.encode("42:");
    assert_eq!(codec.decode(&forged), Verification::Invalid);
    assert_eq!(codec.decode(&STANDARD.encode("42")), Verification::Invalid);
}

#[test]
fn test_signer_debug_does_not_leak_secret() {
    let signer = Signer::new(SecretString::new("do-not-print-this-secret"));
    assert!(!format!("{signer:?}").contains("do-not-print-this-secret"));
}
