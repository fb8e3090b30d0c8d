//! Field layouts: which index holds which attribute.
//!
//! There is no length header and no field names in the payload, only
//! positions. Field 0 carries a version tag (`"V2"`…`"V5"`) in the newer
//! format; anything else means the legacy layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::VERSION_TAGS;
use crate::identity::Attribute;

/// A recognised format version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatVersion {
    V2,
    V3,
    V4,
    V5,
}

impl FormatVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatVersion::V2 => VERSION_TAGS[0],
            FormatVersion::V3 => VERSION_TAGS[1],
            FormatVersion::V4 => VERSION_TAGS[2],
            FormatVersion::V5 => VERSION_TAGS[3],
        }
    }
}

impl FromStr for FormatVersion {
    type Err = String;

    /// Exact, case-sensitive match. `"v3"` or `" V3"` is not a tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "V2" => Ok(FormatVersion::V2),
            "V3" => Ok(FormatVersion::V3),
            "V4" => Ok(FormatVersion::V4),
            "V5" => Ok(FormatVersion::V5),
            other => Err(format!("unknown version tag {:?}", other)),
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The index → attribute mapping in effect for a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "version", rename_all = "snake_case")]
pub enum Layout {
    /// Tagged layout; the photo is spread over every field from
    /// [`crate::config::PHOTO_START_INDEX`] onwards.
    Versioned(FormatVersion),
    /// Untagged layout; the photo is the last field.
    Legacy,
}

/// Versioned layout. Indices 9, 14, 15, 17 and 18 are present in the payload
/// but carry nothing we map.
const VERSIONED_FIELDS: &[(Attribute, usize)] = &[
    (Attribute::ReferenceId, 2),
    (Attribute::Name, 3),
    (Attribute::Dob, 4),
    (Attribute::Gender, 5),
    (Attribute::CareOf, 6),
    (Attribute::District, 7),
    (Attribute::Landmark, 8),
    (Attribute::House, 10),
    (Attribute::Pincode, 11),
    (Attribute::Location, 12),
    (Attribute::State, 13),
    (Attribute::PostOffice, 16),
];

const LEGACY_FIELDS: &[(Attribute, usize)] = &[
    (Attribute::ReferenceId, 1),
    (Attribute::Name, 2),
    (Attribute::Dob, 3),
    (Attribute::Gender, 4),
    (Attribute::Pincode, 10),
];

impl Layout {
    /// Pick the layout from the (already lossily decoded) text of field 0.
    pub fn detect(tag: &str) -> Self {
        match tag.parse::<FormatVersion>() {
            Ok(version) => Layout::Versioned(version),
            Err(_) => Layout::Legacy,
        }
    }

    /// Static attribute/index pairs for this layout.
    pub fn field_map(&self) -> &'static [(Attribute, usize)] {
        match self {
            Layout::Versioned(_) => VERSIONED_FIELDS,
            Layout::Legacy => LEGACY_FIELDS,
        }
    }

    /// Field index for `attribute`, if this layout carries it at all.
    pub fn index_of(&self, attribute: Attribute) -> Option<usize> {
        self.field_map()
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, index)| *index)
    }

    pub fn version(&self) -> Option<FormatVersion> {
        match self {
            Layout::Versioned(version) => Some(*version),
            Layout::Legacy => None,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Versioned(version) => write!(f, "versioned({})", version),
            Layout::Legacy => f.write_str("legacy"),
        }
    }
}
