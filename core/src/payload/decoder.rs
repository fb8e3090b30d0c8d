//! # Payload Decoder
//!
//! A Secure QR code does not carry bytes. It carries a (very long) decimal
//! number. The number's big-endian byte form is a gzip stream, and the
//! decompressed stream is the signed record.
//!
//! ```text
//! "23749718042705..."  (1000+ digits)
//!     -> BigUint (base 10)
//!     -> ceil(bits / 8) big-endian bytes, no sign byte
//!     -> gunzip, capped at DecodeOptions::max_decompressed_len
//! ```
//!
//! Decompression either runs to completion or fails. There is no partial
//! output.

use std::io::Read;

use flate2::read::MultiGzDecoder;
use num_bigint::BigUint;

use crate::config::DecodeOptions;
use crate::error::{Result, SecureQrError};

/// Decode a numeric payload with the default options.
///
/// # Example
///
/// ```
/// use secure_qr::payload::decode;
/// use secure_qr::SecureQrError;
///
/// let err = decode("12ab").unwrap_err();
/// assert!(matches!(err, SecureQrError::InvalidEncoding(_)));
/// ```
pub fn decode(numeric: &str) -> Result<Vec<u8>> {
    decode_with_options(numeric, &DecodeOptions::default())
}

/// Decode a numeric payload into the raw decompressed buffer.
///
/// # Errors
///
/// - [`SecureQrError::InvalidEncoding`] for empty or non-digit input.
/// - [`SecureQrError::DecompressionFailed`] if the bytes are not gzip.
/// - [`SecureQrError::PayloadTooLarge`] if the output exceeds the cap.
pub fn decode_with_options(numeric: &str, options: &DecodeOptions) -> Result<Vec<u8>> {
    let compressed = numeric_to_bytes(numeric)?;
    let raw = decompress(&compressed, options.max_decompressed_len)?;

    tracing::debug!(
        digits = numeric.len(),
        compressed_len = compressed.len(),
        decompressed_len = raw.len(),
        "payload decoded"
    );

    Ok(raw)
}

/// Convert a decimal string to its minimal big-endian byte representation.
///
/// Leading zero digits do not change the result. Zero itself renders as a
/// single `0x00` byte.
pub fn numeric_to_bytes(numeric: &str) -> Result<Vec<u8>> {
    if numeric.is_empty() {
        return Err(SecureQrError::InvalidEncoding("payload is empty".into()));
    }

    // BigUint's own parser tolerates '+' and '_', the format does not.
    if let Some((offset, ch)) = numeric.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(SecureQrError::InvalidEncoding(format!(
            "non-digit character {:?} at offset {}",
            ch, offset
        )));
    }

    let value = BigUint::parse_bytes(numeric.as_bytes(), 10).ok_or_else(|| {
        SecureQrError::InvalidEncoding("payload is not a base-10 integer".into())
    })?;

    let mut bytes = value.to_bytes_be();
    if bytes.is_empty() {
        bytes.push(0);
    }
    Ok(bytes)
}

/// Gunzip `compressed` fully into memory, refusing to produce more than
/// `limit` bytes.
///
/// Concatenated gzip members are all decoded, in order. Bytes after a
/// member that do not start another member are a corrupt stream.
pub fn decompress(compressed: &[u8], limit: usize) -> Result<Vec<u8>> {
    // Read one byte past the limit so "exactly at the limit" and "over it"
    // stay distinguishable.
    let cap = (limit as u64).saturating_add(1);
    let mut reader = MultiGzDecoder::new(compressed).take(cap);

    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| SecureQrError::DecompressionFailed(e.to_string()))?;

    if out.len() > limit {
        tracing::warn!(limit, "decompressed payload exceeds cap");
        return Err(SecureQrError::PayloadTooLarge { limit });
    }

    Ok(out)
}
