//! Error types for the Secure QR pipeline.
//!
//! Every decode, split, parse or trust-anchor operation that can fail returns
//! a [`SecureQrError`]. Library errors from `flate2`, `der` and `rsa` are
//! normalized into one of these kinds at the component boundary, so nothing
//! uncategorized leaks out.
//!
//! A signature that does not verify is *not* in here. That is a normal,
//! reportable outcome; see [`crate::crypto::VerificationOutcome`].

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SecureQrError>;

/// Failure modes of the decode → verify → parse chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecureQrError {
    /// The payload is empty or contains something other than ASCII digits.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// The byte form of the payload is not a valid gzip stream.
    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    /// The decompressed payload exceeded the configured cap.
    #[error("payload too large: decompressed size exceeds {limit} bytes")]
    PayloadTooLarge {
        /// The cap that was hit.
        limit: usize,
    },

    /// Too short for the fixed-offset format (signature or field count).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The trust anchor could not be read or is not a usable certificate.
    #[error("trust anchor error: {0}")]
    TrustAnchorError(String),
}

impl SecureQrError {
    /// Stable, machine-readable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            SecureQrError::InvalidEncoding(_) => "invalid_encoding",
            SecureQrError::DecompressionFailed(_) => "decompression_failed",
            SecureQrError::PayloadTooLarge { .. } => "payload_too_large",
            SecureQrError::MalformedPayload(_) => "malformed_payload",
            SecureQrError::TrustAnchorError(_) => "trust_anchor_error",
        }
    }
}
