//! # Signature Verification
//!
//! The last [`SIGNATURE_LENGTH`] bytes of a decompressed payload are an
//! RSA-2048 signature over everything before them. The scheme is RSA-PSS
//! with SHA-256 as both the message digest and the MGF1 digest, and the
//! salt is as long as the key allows:
//!
//! ```text
//! emLen    = ceil((modulus_bits - 1) / 8)
//! salt_len = emLen - digest_len - 2        (222 for RSA-2048)
//! ```
//!
//! That salt length is not what most libraries pick by default (they use
//! the digest length). The PSS verifier checks the salt length exactly, so
//! getting this wrong rejects every genuine payload.
//!
//! ## Outcome, not error
//!
//! A signature that does not verify is an answer, not a failure. Everything
//! that goes wrong *after* the trust anchor has been read (bad padding,
//! wrong key type, wrong signature length) comes back as
//! [`VerificationOutcome`] with `authentic == false` and a reason. Only an
//! unreadable anchor or a buffer too short to hold a signature is an `Err`.

use std::path::Path;

use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::hash::sha256;
use super::trust_anchor::TrustAnchor;
use crate::config::{DIGEST_LENGTH, SIGNATURE_ALGORITHM, SIGNATURE_LENGTH};
use crate::error::{Result, SecureQrError};

/// Result of checking one payload signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub authentic: bool,
    /// Human-readable reason. Never empty.
    pub detail: String,
}

impl VerificationOutcome {
    fn authentic(detail: String) -> Self {
        Self {
            authentic: true,
            detail,
        }
    }

    fn rejected(detail: String) -> Self {
        Self {
            authentic: false,
            detail,
        }
    }
}

/// Split a decompressed buffer into `(signed_content, signature)`.
///
/// # Errors
///
/// [`SecureQrError::MalformedPayload`] if `raw` is shorter than
/// [`SIGNATURE_LENGTH`].
pub fn split_signature(raw: &[u8]) -> Result<(&[u8], &[u8])> {
    let boundary = raw.len().checked_sub(SIGNATURE_LENGTH).ok_or_else(|| {
        SecureQrError::MalformedPayload(format!(
            "payload is {} bytes, too short to carry a {}-byte signature",
            raw.len(),
            SIGNATURE_LENGTH
        ))
    })?;
    Ok(raw.split_at(boundary))
}

/// Verify the trailing signature of `raw` against the certificate at
/// `trust_anchor_path`.
///
/// The certificate is read once, fully, and not retained.
///
/// # Errors
///
/// - [`SecureQrError::MalformedPayload`] if `raw` cannot hold a signature.
/// - [`SecureQrError::TrustAnchorError`] if the certificate cannot be read
///   or parsed.
///
/// A signature that does not check out is `Ok` with `authentic == false`.
pub fn verify(raw: &[u8], trust_anchor_path: &Path) -> Result<VerificationOutcome> {
    let (signed_content, signature) = split_signature(raw)?;
    let anchor = TrustAnchor::load(trust_anchor_path)?;
    Ok(verify_with_anchor(signed_content, signature, &anchor))
}

/// Verify `signature` over `signed_content` with an already-loaded anchor.
pub fn verify_with_anchor(
    signed_content: &[u8],
    signature: &[u8],
    anchor: &TrustAnchor,
) -> VerificationOutcome {
    let key = match anchor.rsa_public_key() {
        Ok(key) => key,
        Err(reason) => return VerificationOutcome::rejected(reason),
    };
    verify_with_key(signed_content, signature, &key)
}

/// Verify with a bare RSA public key.
pub fn verify_with_key(
    signed_content: &[u8],
    signature: &[u8],
    key: &RsaPublicKey,
) -> VerificationOutcome {
    let Some(salt_len) = max_salt_len(key) else {
        return VerificationOutcome::rejected(format!(
            "{}-bit key is too small for {}",
            key.n().bits(),
            SIGNATURE_ALGORITHM
        ));
    };

    let digest = sha256(signed_content);
    match key.verify(Pss::new_with_salt::<Sha256>(salt_len), &digest, signature) {
        Ok(()) => VerificationOutcome::authentic(format!(
            "signature valid ({}, salt length {})",
            SIGNATURE_ALGORITHM, salt_len
        )),
        Err(e) => VerificationOutcome::rejected(format!(
            "signature verification failed ({}): {}",
            SIGNATURE_ALGORITHM, e
        )),
    }
}

/// Longest PSS salt a SHA-256 signature can carry under `key`, or `None`
/// if the modulus is too small for any.
pub fn max_salt_len(key: &RsaPublicKey) -> Option<usize> {
    let em_bits = key.n().bits().checked_sub(1)?;
    let em_len = em_bits.div_ceil(8);
    em_len.checked_sub(DIGEST_LENGTH + 2)
}
