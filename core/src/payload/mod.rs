//! # Payload Handling
//!
//! Everything between the raw numeric string and the typed record:
//!
//! 1. **decoder** — decimal string → big-endian bytes → gunzip.
//! 2. **parser** — signed content → `0xFF`-delimited fields → record.
//! 3. **layout** — which field index means what, per format version.
//! 4. **photo** — stitching the photo back together after the naive split
//!    tore it apart at every `0xFF`.
//!
//! None of this touches the signature. See [`crate::crypto`] for that.

pub mod decoder;
pub mod layout;
pub mod parser;
pub mod photo;

pub use decoder::{decode, decode_with_options, decompress, numeric_to_bytes};
pub use layout::{FormatVersion, Layout};
pub use parser::{parse, preview_fields, split_fields, FieldPreview, FieldSet};
pub use photo::{reconstruct_photo_from_fragments, PhotoFormat};
