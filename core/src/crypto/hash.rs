//! # Hashing Utilities
//!
//! SHA-256, and only SHA-256. It is the digest the issuing authority signs
//! with, so there is nothing to choose here.
//!
//! Besides feeding the PSS verifier, the digest doubles as a certificate
//! fingerprint: the SHA-256 of a trust anchor's DER encoding is what shows
//! up in logs and reports, so an operator can tell at a glance *which*
//! certificate vouched for a payload.

use sha2::{Digest, Sha256};

use crate::config::DIGEST_LENGTH;

/// Compute the SHA-256 digest of `data`.
///
/// # Example
///
/// ```
/// use secure_qr::crypto::sha256;
///
/// let hash = sha256(b"secure qr");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Lowercase hex SHA-256, the form used for certificate fingerprints.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
