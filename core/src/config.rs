//! # Format Constants & Tunables
//!
//! Every magic number of the Secure QR format lives here. If you're
//! hardcoding a `0xFF` or a `256` somewhere else, move it here first.
//!
//! Most of these values are dictated by the issuing authority's format and
//! are not ours to change. The ones that *are* ours (the decompression cap)
//! are exposed through [`DecodeOptions`] so callers can tune them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record Format
// ---------------------------------------------------------------------------

/// The field separator inside the signed content. Also a perfectly ordinary
/// byte inside JPEG-2000 photo data, which is the root of most of our pain.
pub const FIELD_DELIMITER: u8 = 0xFF;

/// A record with fewer fields than this is not a Secure QR record in any
/// known layout.
pub const MIN_FIELD_COUNT: usize = 5;

/// Version tags recognised in field 0. Anything else falls back to the
/// legacy layout.
pub const VERSION_TAGS: [&str; 4] = ["V2", "V3", "V4", "V5"];

/// First field index of the photo in the versioned layout.
///
/// Learned empirically from real payloads. The photo's leading `0xFF` doubles
/// as the delimiter after the last text field, so the fragment at this index
/// starts with `0x4F`. Newer format revisions may shift it.
pub const PHOTO_START_INDEX: usize = 19;

/// JPEG-2000 start-of-codestream marker (`SOC`).
pub const JP2_SOC_MARKER: [u8; 2] = [0xFF, 0x4F];

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// The trailing signature is a raw RSA-2048 signature: always 256 bytes.
pub const SIGNATURE_LENGTH: usize = 256;

/// SHA-256 output length. Used both as the PSS digest and in the max-salt
/// computation.
pub const DIGEST_LENGTH: usize = 32;

/// Signature scheme, for log lines and reports.
pub const SIGNATURE_ALGORITHM: &str = "RSASSA-PSS/SHA-256/MGF1-SHA-256/max-salt";

// ---------------------------------------------------------------------------
// Resource Limits
// ---------------------------------------------------------------------------

/// Default ceiling on the decompressed payload size. A genuine record is a
/// few kilobytes; 16 MiB leaves room for anything plausible and stops
/// decompression bombs long before they hurt.
pub const DEFAULT_MAX_DECOMPRESSED_LEN: usize = 16 * 1024 * 1024;

/// Knobs for the decoding stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Maximum number of decompressed bytes accepted before giving up with
    /// `PayloadTooLarge`.
    pub max_decompressed_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_decompressed_len: DEFAULT_MAX_DECOMPRESSED_LEN,
        }
    }
}

impl DecodeOptions {
    /// Options with a custom decompression cap.
    pub fn with_max_decompressed_len(max_decompressed_len: usize) -> Self {
        Self {
            max_decompressed_len,
        }
    }
}
