//! # Trust Anchors
//!
//! The issuing authority publishes an X.509 certificate; its public key is
//! what every genuine payload signature verifies against. This module loads
//! that certificate from PEM or DER and hands out its RSA key.
//!
//! Loading is scoped: the file is opened, read in full and closed before
//! [`TrustAnchor::load`] returns. Nothing here caches. If a caller wants to
//! reuse an anchor across requests, a `TrustAnchor` is immutable and
//! `Send + Sync`, so sharing one behind an `Arc` is fine.
//!
//! Two kinds of failure, deliberately kept apart:
//!
//! - The file is missing, unreadable or not a certificate: that is an
//!   infrastructure problem, [`SecureQrError::TrustAnchorError`].
//! - The certificate is fine but its key is not RSA: that surfaces later,
//!   during verification, as an *unauthentic* outcome with a reason.

use std::fmt;
use std::fs;
use std::path::Path;

use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use x509_cert::der::{Decode, DecodePem, Encode};
use x509_cert::Certificate;

use super::hash::sha256_hex;
use crate::error::{Result, SecureQrError};

const PEM_PREFIX: &[u8] = b"-----BEGIN";

/// A parsed trust-anchor certificate.
#[derive(Clone)]
pub struct TrustAnchor {
    certificate: Certificate,
    /// Canonical DER of the certificate, kept for fingerprinting.
    der: Vec<u8>,
}

impl TrustAnchor {
    /// Read and parse a certificate file (PEM or DER).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            SecureQrError::TrustAnchorError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let anchor = Self::from_bytes(&bytes)?;

        tracing::debug!(
            path = %path.display(),
            fingerprint = %anchor.fingerprint(),
            "trust anchor loaded"
        );
        Ok(anchor)
    }

    /// Parse a certificate from memory. PEM is recognised by its
    /// `-----BEGIN` armour; anything else is treated as DER.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        let trimmed = &bytes[start..];
        let certificate = if trimmed.starts_with(PEM_PREFIX) {
            Certificate::from_pem(trimmed).map_err(|e| {
                SecureQrError::TrustAnchorError(format!("invalid PEM certificate: {}", e))
            })?
        } else {
            Certificate::from_der(bytes).map_err(|e| {
                SecureQrError::TrustAnchorError(format!("invalid DER certificate: {}", e))
            })?
        };

        let der = certificate.to_der().map_err(|e| {
            SecureQrError::TrustAnchorError(format!("cannot re-encode certificate: {}", e))
        })?;

        Ok(Self { certificate, der })
    }

    /// The certificate subject, RFC 4514 style.
    pub fn subject(&self) -> String {
        self.certificate.tbs_certificate.subject.to_string()
    }

    /// Hex SHA-256 over the certificate's DER encoding.
    pub fn fingerprint(&self) -> String {
        sha256_hex(&self.der)
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// The subject's RSA public key.
    ///
    /// The error is a plain reason string rather than a [`SecureQrError`]:
    /// a non-RSA key makes the *signature* unverifiable, it does not make
    /// the anchor unreadable.
    pub fn rsa_public_key(&self) -> std::result::Result<RsaPublicKey, String> {
        let spki = self
            .certificate
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| format!("cannot encode subject public key: {}", e))?;

        RsaPublicKey::from_public_key_der(&spki)
            .map_err(|e| format!("trust anchor key is not a usable RSA public key: {}", e))
    }
}

impl fmt::Debug for TrustAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustAnchor")
            .field("subject", &self.subject())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}
