//! # Cryptography
//!
//! Everything needed to decide whether a payload really came from the
//! issuing authority:
//!
//! - **SHA-256** for the message digest and certificate fingerprints.
//! - **X.509** trust anchors, PEM or DER.
//! - **RSA-PSS** verification with the format's maximum-salt parameters.
//!
//! Nothing here signs. Issuing payloads is the authority's job; the only
//! private keys in this repository are test fixtures.

pub mod hash;
pub mod signatures;
pub mod trust_anchor;

pub use hash::{sha256, sha256_hex};
pub use signatures::{
    max_salt_len, split_signature, verify, verify_with_anchor, verify_with_key,
    VerificationOutcome,
};
pub use trust_anchor::TrustAnchor;
