// Copyright (c) 2026 Secure QR Contributors. MIT License.
// See LICENSE for details.

//! # Secure QR — Core Library
//!
//! Turns the numeric string printed inside a Secure QR identity code into an
//! authenticated, structured identity record plus the holder's photo.
//!
//! The payload travels through three stages, strictly in order:
//!
//! ```text
//! "2374971804270526477833002468783965837992554564899874087591661303..."
//!     -> decimal big integer -> big-endian bytes -> gunzip      (payload::decoder)
//!     -> signed content ++ 256-byte RSA signature              (crypto::signatures)
//!     -> 0xFF-delimited fields -> versioned/legacy layout      (payload::parser)
//!     -> IdentityRecord { name, dob, ..., photo_bytes }
//! ```
//!
//! ## Architecture
//!
//! - **payload** — Decimal decoding, decompression, field splitting, layout
//!   dispatch and photo reconstruction.
//! - **crypto** — Trust-anchor loading and RSA-PSS verification.
//! - **identity** — The typed identity record and holder matching.
//! - **pipeline** — Glue: runs all three stages under a signature policy.
//! - **config** — Format constants and tunables.
//! - **error** — The crate-wide error taxonomy.
//!
//! ## Design Philosophy
//!
//! 1. A bad signature is an *outcome*, not an error. Callers decide whether
//!    it is fatal.
//! 2. No global state. Every call stands alone and can run on any thread.
//! 3. Never crash on hostile bytes. Text decodes lossily, missing fields are
//!    empty, oversized payloads are refused.

pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod payload;
pub mod pipeline;

pub use error::{Result, SecureQrError};
pub use identity::{IdentityRecord, MatchRequest, MatchResult};
pub use pipeline::{
    scan, scan_with_anchor, ScanError, ScanOptions, ScanReport, SignaturePolicy, TrustStatus,
};
