//! # Field Parser
//!
//! Signed content → fields → [`IdentityRecord`].
//!
//! The record is a flat run of `0xFF`-separated fields. Text fields are
//! UTF-8 and never contain `0xFF` (it is not a valid UTF-8 byte), so the
//! split is exact for them. The photo is raw binary and does contain `0xFF`,
//! so the split shreds it; [`super::photo`] deals with that.
//!
//! Parsing is deliberately forgiving: invalid UTF-8 is replaced, missing
//! indices are empty strings, and nothing is validated. The one hard rule is
//! a minimum of [`MIN_FIELD_COUNT`] fields.

use std::borrow::Cow;

use serde::Serialize;

use crate::config::{FIELD_DELIMITER, MIN_FIELD_COUNT};
use crate::error::{Result, SecureQrError};
use crate::identity::IdentityRecord;

use super::layout::Layout;
use super::photo::{photo_fragments, reconstruct_photo_from_fragments};

/// Longest text shown per field in a [`FieldPreview`].
const PREVIEW_CHARS: usize = 50;

/// Split `signed_content` on every `0xFF`.
///
/// Empty fields between consecutive delimiters are kept, and so is a trailing
/// empty field after a final delimiter. Empty input yields one empty field.
pub fn split_fields(signed_content: &[u8]) -> Vec<&[u8]> {
    signed_content
        .split(|byte| *byte == FIELD_DELIMITER)
        .collect()
}

/// The ordered fields of one record, borrowed from the signed content.
#[derive(Debug, Clone)]
pub struct FieldSet<'a> {
    fields: Vec<&'a [u8]>,
}

impl<'a> FieldSet<'a> {
    pub fn split(signed_content: &'a [u8]) -> Self {
        Self {
            fields: split_fields(signed_content),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.fields.get(index).copied()
    }

    /// Lossy UTF-8 text of field `index`; `""` if there is no such field.
    pub fn text(&self, index: usize) -> String {
        self.get(index)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<&'a [u8]> {
        self.fields.last().copied()
    }

    pub fn as_slice(&self) -> &[&'a [u8]] {
        &self.fields
    }
}

/// Parse signed content into an identity record.
///
/// # Errors
///
/// [`SecureQrError::MalformedPayload`] if there are fewer than
/// [`MIN_FIELD_COUNT`] fields. Nothing else fails.
///
/// # Example
///
/// ```
/// use secure_qr::payload::parse;
///
/// let content = b"V3\xff3\xff1234\xffRAMESH KUMAR\xff01-01-1990\xffM";
/// let record = parse(content).unwrap();
/// assert_eq!(record.name(), "RAMESH KUMAR");
/// assert_eq!(record.state(), "");
/// ```
pub fn parse(signed_content: &[u8]) -> Result<IdentityRecord> {
    let fields = FieldSet::split(signed_content);
    if fields.len() < MIN_FIELD_COUNT {
        return Err(SecureQrError::MalformedPayload(format!(
            "expected at least {} fields, found {}",
            MIN_FIELD_COUNT,
            fields.len()
        )));
    }

    let layout = Layout::detect(&fields.text(0));
    let mut record = IdentityRecord::empty(layout);
    for (attribute, index) in layout.field_map() {
        record.set(*attribute, fields.text(*index));
    }

    let photo = match layout {
        Layout::Versioned(_) => {
            reconstruct_photo_from_fragments(photo_fragments(fields.as_slice()))
        }
        // Fields are at least MIN_FIELD_COUNT long here, so there is a last one.
        Layout::Legacy => fields.last().map(<[u8]>::to_vec).unwrap_or_default(),
    };
    record.set_photo(photo);

    tracing::debug!(
        layout = %layout,
        field_count = fields.len(),
        photo_len = record.photo_bytes().len(),
        "payload parsed"
    );

    Ok(record)
}

/// One line of a raw field dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPreview {
    pub index: usize,
    /// Length in bytes, before any decoding.
    pub len: usize,
    /// Lossy text, cut at [`PREVIEW_CHARS`] characters with a trailing `...`.
    pub text: String,
}

/// Dump every field of `signed_content` for inspection.
///
/// Meant for diagnosing layout drift on real payloads ("which index is the
/// name on this card?"), not for production paths: it shows field values.
pub fn preview_fields(signed_content: &[u8]) -> Vec<FieldPreview> {
    split_fields(signed_content)
        .into_iter()
        .enumerate()
        .map(|(index, bytes)| FieldPreview {
            index,
            len: bytes.len(),
            text: truncate(String::from_utf8_lossy(bytes)),
        })
        .collect()
}

fn truncate(text: Cow<'_, str>) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}
