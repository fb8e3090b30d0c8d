//! End-to-end integration tests for the Secure QR pipeline.
//!
//! These tests push real numeric payloads through every stage: decimal
//! decoding, gunzip, signature split, RSA-PSS verification against a
//! certificate on disk, field parsing and photo reconstruction. They prove
//! the stages compose, and that the signature policy turns verifier outcomes
//! into the right decisions.
//!
//! `fixtures/v3_signed_payload.txt` was produced outside this crate, with
//! OpenSSL signing under `fixtures/anchor_key.pem` (`rsa_pss_saltlen:max`).
//! Payloads built in here are signed with the same key through the `rsa`
//! crate.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use num_bigint::BigUint;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pss, RsaPrivateKey};
use sha2::{Digest, Sha256};

use secure_qr::config::{DecodeOptions, FIELD_DELIMITER, SIGNATURE_LENGTH};
use secure_qr::crypto::{max_salt_len, split_signature, verify, TrustAnchor};
use secure_qr::identity::match_holder;
use secure_qr::payload::{decode, parse, FormatVersion, Layout, PhotoFormat};
use secure_qr::{
    scan, scan_with_anchor, MatchRequest, ScanError, ScanOptions, SecureQrError,
    SignaturePolicy, TrustStatus,
};

const ANCHOR_FINGERPRINT: &str =
    "1700d62520f7cf83ab578fc2134681a88e3c344f1fb6f5527442e2d7a69aff55";

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn signed_v3_payload() -> String {
    std::fs::read_to_string(fixture("v3_signed_payload.txt"))
        .expect("fixture payload")
        .trim()
        .to_string()
}

fn signing_key() -> RsaPrivateKey {
    let pem = std::fs::read_to_string(fixture("anchor_key.pem")).expect("fixture key");
    RsaPrivateKey::from_pkcs8_pem(&pem).expect("PKCS#8 key")
}

/// Append a max-salt RSA-PSS signature, as the issuing authority does.
fn sign_content(content: &[u8]) -> Vec<u8> {
    let key = signing_key();
    let salt_len = max_salt_len(&key.to_public_key()).expect("2048-bit key");
    let digest = Sha256::digest(content);
    let signature = key
        .sign_with_rng(
            &mut rand::thread_rng(),
            Pss::new_with_salt::<Sha256>(salt_len),
            &digest,
        )
        .expect("signing");

    let mut raw = content.to_vec();
    raw.extend(signature);
    raw
}

/// gzip, then render the compressed bytes as one big decimal integer.
fn encode(raw: &[u8]) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw).expect("gzip write");
    let compressed = encoder.finish().expect("gzip finish");
    BigUint::from_bytes_be(&compressed).to_str_radix(10)
}

fn join_fields(fields: &[&[u8]]) -> Vec<u8> {
    fields.join(&FIELD_DELIMITER)
}

fn legacy_content() -> Vec<u8> {
    let fields: [&[u8]; 12] = [
        b"2",
        b"987654321012",
        b"Anita Desai",
        b"22-02-1985",
        b"F",
        b"",
        b"",
        b"",
        b"",
        b"",
        b"400001",
        &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
    ];
    join_fields(&fields)
}

// ---------------------------------------------------------------------------
// 1. Genuine Versioned Payload
// ---------------------------------------------------------------------------

#[test]
fn genuine_v3_payload_verifies_and_parses() {
    let report = scan(
        &signed_v3_payload(),
        Some(fixture("anchor_cert.pem").as_path()),
        &ScanOptions::strict(),
    )
    .expect("genuine payload scans under strict options");

    match &report.trust {
        TrustStatus::Verified {
            anchor_fingerprint, ..
        } => assert_eq!(anchor_fingerprint, ANCHOR_FINGERPRINT),
        other => panic!("expected verified, got {:?}", other),
    }
    assert_eq!(report.raw_len, 733);
    assert_eq!(report.signed_len, 733 - SIGNATURE_LENGTH);

    let record = &report.record;
    assert_eq!(record.layout(), Layout::Versioned(FormatVersion::V3));
    assert_eq!(record.reference_id(), "123420190101120000000");
    assert_eq!(record.name(), "RAMESH KUMAR");
    assert_eq!(record.dob(), "01-01-1990");
    assert_eq!(record.gender(), "M");
    assert_eq!(record.care_of(), "S/O Suresh Kumar");
    assert_eq!(record.district(), "Bengaluru Urban");
    assert_eq!(record.landmark(), "Near City Market");
    assert_eq!(record.house(), "12/4");
    assert_eq!(record.pincode(), "560001");
    assert_eq!(record.location(), "Shivajinagar");
    assert_eq!(record.state(), "Karnataka");
    assert_eq!(record.post_office(), "Bangalore GPO");

    assert_eq!(record.photo_bytes().len(), 291);
    assert_eq!(&record.photo_bytes()[..2], &[0xFF, 0x4F]);
    assert_eq!(&record.photo_bytes()[289..], &[0xFF, 0xD9]);
    assert_eq!(record.photo_format(), PhotoFormat::Jpeg2000Codestream);
}

#[test]
fn der_anchor_is_equivalent_to_pem() {
    let report = scan(
        &signed_v3_payload(),
        Some(fixture("anchor_cert.der").as_path()),
        &ScanOptions::strict(),
    )
    .expect("DER anchor accepted");
    assert!(report.trust.is_verified());
}

#[test]
fn stages_compose_by_hand() {
    let raw = decode(&signed_v3_payload()).expect("decode");
    let outcome = verify(&raw, &fixture("anchor_cert.pem")).expect("anchor readable");
    assert!(outcome.authentic, "{}", outcome.detail);

    let (signed_content, signature) = split_signature(&raw).expect("split");
    assert_eq!(signature.len(), SIGNATURE_LENGTH);
    let record = parse(signed_content).expect("parse");
    assert_eq!(record.name(), "RAMESH KUMAR");
}

// ---------------------------------------------------------------------------
// 2. Missing or Wrong Trust Anchor
// ---------------------------------------------------------------------------

#[test]
fn no_anchor_is_skipped_not_verified() {
    let report = scan(&signed_v3_payload(), None, &ScanOptions::default())
        .expect("lenient scan without anchor");
    assert_eq!(report.trust, TrustStatus::Skipped);
    assert!(!report.trust.is_verified());
    assert_eq!(report.record.name(), "RAMESH KUMAR");
}

#[test]
fn no_anchor_when_required_fails() {
    let options = ScanOptions {
        require_trust_anchor: true,
        ..ScanOptions::default()
    };
    let err = scan(&signed_v3_payload(), None, &options).unwrap_err();
    assert_eq!(err, ScanError::TrustAnchorRequired);
}

#[test]
fn unrelated_anchor_warns_or_rejects_by_policy() {
    let payload = signed_v3_payload();
    let other = fixture("other_cert.pem");

    let report = scan(&payload, Some(other.as_path()), &ScanOptions::default())
        .expect("warn-and-continue still yields a record");
    assert!(matches!(report.trust, TrustStatus::Failed { ref detail } if !detail.is_empty()));
    assert_eq!(report.record.state(), "Karnataka");

    let options = ScanOptions {
        policy: SignaturePolicy::Enforce,
        ..ScanOptions::default()
    };
    let err = scan(&payload, Some(other.as_path()), &options).unwrap_err();
    assert!(matches!(err, ScanError::SignatureRejected(_)));
    assert_eq!(err.code(), "signature_rejected");
}

#[test]
fn ec_anchor_is_a_failed_check_not_an_error() {
    let report = scan(
        &signed_v3_payload(),
        Some(fixture("ec_cert.pem").as_path()),
        &ScanOptions::default(),
    )
    .expect("non-RSA anchor is an outcome");
    assert_eq!(report.trust.label(), "failed");
}

#[test]
fn unreadable_anchor_is_an_error() {
    let err = scan(
        &signed_v3_payload(),
        Some(Path::new("/nonexistent/authority.cer")),
        &ScanOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ScanError::Payload(SecureQrError::TrustAnchorError(_))
    ));

    let mut garbage = tempfile::NamedTempFile::new().unwrap();
    garbage.write_all(b"definitely not a certificate").unwrap();
    let err = scan(
        &signed_v3_payload(),
        Some(garbage.path()),
        &ScanOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "trust_anchor_error");
}

// ---------------------------------------------------------------------------
// 3. Synthetic Payloads
// ---------------------------------------------------------------------------

#[test]
fn legacy_payload_roundtrip() {
    let anchor = TrustAnchor::load(fixture("anchor_cert.pem")).unwrap();
    let payload = encode(&sign_content(&legacy_content()));

    let report = scan_with_anchor(&payload, Some(&anchor), &ScanOptions::strict())
        .expect("signed legacy payload");
    assert!(report.trust.is_verified());

    let record = report.record;
    assert_eq!(record.layout(), Layout::Legacy);
    assert_eq!(record.reference_id(), "987654321012");
    assert_eq!(record.name(), "Anita Desai");
    assert_eq!(record.pincode(), "400001");
    assert_eq!(record.state(), "");
    // The naive split ate the JPEG's leading 0xFF; legacy keeps the last field as is.
    assert_eq!(record.photo_bytes(), &[0xE0, 0x00, 0x10]);
}

#[test]
fn tampered_content_fails_verification() {
    let mut raw = sign_content(&legacy_content());
    // "Anita" -> "Bnita"
    let name_at = raw
        .windows(5)
        .position(|w| w == b"Anita")
        .expect("name present");
    raw[name_at] ^= 0x03;

    let anchor = TrustAnchor::load(fixture("anchor_cert.pem")).unwrap();
    let report = scan_with_anchor(&encode(&raw), Some(&anchor), &ScanOptions::default())
        .expect("lenient scan");
    assert!(matches!(report.trust, TrustStatus::Failed { .. }));
    assert_eq!(report.record.name(), "Bnita Desai");

    let err = scan_with_anchor(&encode(&raw), Some(&anchor), &ScanOptions::strict()).unwrap_err();
    assert!(matches!(err, ScanError::SignatureRejected(_)));
}

#[test]
fn too_few_fields_after_valid_signature() {
    let payload = encode(&sign_content(b"V3\xffonly\xfffour\xfffields"));
    let err = scan(&payload, None, &ScanOptions::default()).unwrap_err();
    assert_eq!(err.code(), "malformed_payload");
}

#[test]
fn buffer_shorter_than_signature() {
    let payload = encode(&[0x42; SIGNATURE_LENGTH - 1]);
    let err = scan(&payload, None, &ScanOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ScanError::Payload(SecureQrError::MalformedPayload(_))
    ));
}

#[test]
fn decompression_cap_is_honoured() {
    let options = ScanOptions {
        decode: DecodeOptions::with_max_decompressed_len(100),
        ..ScanOptions::default()
    };
    let err = scan(&signed_v3_payload(), None, &options).unwrap_err();
    assert_eq!(
        err,
        ScanError::Payload(SecureQrError::PayloadTooLarge { limit: 100 })
    );
}

#[test]
fn garbage_payloads_are_categorised() {
    let options = ScanOptions::default();
    assert_eq!(scan("", None, &options).unwrap_err().code(), "invalid_encoding");
    assert_eq!(
        scan("12 34", None, &options).unwrap_err().code(),
        "invalid_encoding"
    );
    assert_eq!(
        scan("123456789", None, &options).unwrap_err().code(),
        "decompression_failed"
    );
}

// ---------------------------------------------------------------------------
// 4. Holder Matching on a Scanned Record
// ---------------------------------------------------------------------------

#[test]
fn holder_matches_scanned_record() {
    let report = scan(
        &signed_v3_payload(),
        Some(fixture("anchor_cert.pem").as_path()),
        &ScanOptions::strict(),
    )
    .unwrap();

    let request = MatchRequest {
        name: "Ramesh Kumar".into(),
        dob: "01-01-1990".into(),
        last_4_digits: Some("1234".into()),
    };
    assert!(match_holder(&report.record, &request).is_full_match());

    let impostor = MatchRequest {
        name: "Ramesh Kumar".into(),
        dob: "02-01-1990".into(),
        last_4_digits: Some("1234".into()),
    };
    let result = match_holder(&report.record, &impostor);
    assert!(result.name_matched);
    assert!(!result.dob_matched);
    assert!(!result.is_full_match());
}
