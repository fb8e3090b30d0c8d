//! # Photo Reconstruction
//!
//! The versioned layout stores the holder's photo as a raw JPEG-2000
//! codestream after the last text field. The format has no length prefix
//! and no escaping, and a JPEG-2000 codestream is *full* of `0xFF` bytes:
//! every marker starts with one, beginning with the `FF 4F` start marker.
//!
//! So the naive split on `0xFF` shreds the photo into fragments, and the
//! very first `0xFF` of the image is eaten as the delimiter after the last
//! text field. Putting it back together:
//!
//! ```text
//! fields[19..] = [ 4F, 51 00 29 ..., 90 00 0A ..., ..., D9 ]
//! photo        = FF 4F FF 51 00 29 ... FF 90 00 0A ... FF D9
//! ```
//!
//! This works only because every field before the photo is delimiter-free
//! text, and only as long as the photo really starts at
//! [`PHOTO_START_INDEX`]. It is a positional heuristic, not a parser.

use serde::{Deserialize, Serialize};

use crate::config::{FIELD_DELIMITER, PHOTO_START_INDEX};

/// Rejoin photo fragments with the delimiter the split consumed, and restore
/// the leading `0xFF` of the start marker.
///
/// `fragments` are the fields from [`PHOTO_START_INDEX`] to the end. The
/// leading `0xFF` is always restored, so an empty slice yields `[0xFF]`.
///
/// # Example
///
/// ```
/// use secure_qr::payload::reconstruct_photo_from_fragments;
///
/// let fragments: [&[u8]; 3] = [&[0x4F], &[0x51, 0x00], &[0xD9]];
/// let photo = reconstruct_photo_from_fragments(&fragments);
/// assert_eq!(photo, vec![0xFF, 0x4F, 0xFF, 0x51, 0x00, 0xFF, 0xD9]);
/// ```
pub fn reconstruct_photo_from_fragments(fragments: &[&[u8]]) -> Vec<u8> {
    let total: usize = 1 + fragments.iter().map(|f| f.len() + 1).sum::<usize>();
    let mut photo = Vec::with_capacity(total);
    photo.push(FIELD_DELIMITER);
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            photo.push(FIELD_DELIMITER);
        }
        photo.extend_from_slice(fragment);
    }
    photo
}

/// Fields from the photo start index onwards, or nothing if the payload is
/// shorter than that.
pub(crate) fn photo_fragments<'a>(fields: &'a [&'a [u8]]) -> &'a [&'a [u8]] {
    fields.get(PHOTO_START_INDEX..).unwrap_or(&[])
}

/// What the photo bytes look like, judged by their magic numbers.
///
/// Converting the photo to something displayable is the caller's job; this
/// just tells them which decoder to reach for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoFormat {
    /// Bare JPEG-2000 codestream (`FF 4F FF 51`).
    Jpeg2000Codestream,
    /// JPEG-2000 JP2 container (signature box).
    Jp2Container,
    /// Baseline JPEG (`FF D8 FF`).
    Jpeg,
    Unknown,
}

const J2K_CODESTREAM_MAGIC: [u8; 4] = [0xFF, 0x4F, 0xFF, 0x51];
const JP2_CONTAINER_MAGIC: [u8; 12] = [
    0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20, 0x0D, 0x0A, 0x87, 0x0A,
];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

impl PhotoFormat {
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&J2K_CODESTREAM_MAGIC) {
            PhotoFormat::Jpeg2000Codestream
        } else if bytes.starts_with(&JP2_CONTAINER_MAGIC) {
            PhotoFormat::Jp2Container
        } else if bytes.starts_with(&JPEG_MAGIC) {
            PhotoFormat::Jpeg
        } else {
            PhotoFormat::Unknown
        }
    }

    /// Conventional file extension, handy when dumping the raw bytes.
    pub fn extension(&self) -> &'static str {
        match self {
            PhotoFormat::Jpeg2000Codestream => "j2k",
            PhotoFormat::Jp2Container => "jp2",
            PhotoFormat::Jpeg => "jpg",
            PhotoFormat::Unknown => "bin",
        }
    }
}
