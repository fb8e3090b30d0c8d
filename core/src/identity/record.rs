//! The identity record produced by the field parser.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::payload::layout::Layout;
use crate::payload::photo::PhotoFormat;

/// A text attribute of the identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    ReferenceId,
    Name,
    Dob,
    Gender,
    CareOf,
    District,
    Landmark,
    House,
    Location,
    Pincode,
    State,
    PostOffice,
}

impl Attribute {
    /// Every text attribute, in display order.
    pub const ALL: [Attribute; 12] = [
        Attribute::ReferenceId,
        Attribute::Name,
        Attribute::Dob,
        Attribute::Gender,
        Attribute::CareOf,
        Attribute::District,
        Attribute::Landmark,
        Attribute::House,
        Attribute::Location,
        Attribute::Pincode,
        Attribute::State,
        Attribute::PostOffice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::ReferenceId => "reference_id",
            Attribute::Name => "name",
            Attribute::Dob => "dob",
            Attribute::Gender => "gender",
            Attribute::CareOf => "care_of",
            Attribute::District => "district",
            Attribute::Landmark => "landmark",
            Attribute::House => "house",
            Attribute::Location => "location",
            Attribute::Pincode => "pincode",
            Attribute::State => "state",
            Attribute::PostOffice => "post_office",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded identity attributes plus the holder's photo.
///
/// Built once by [`crate::payload::parse`] and never mutated afterwards:
/// there are accessors but no setters. Attributes the layout does not carry
/// (the legacy layout has no address lines, for instance) are empty strings.
///
/// Nothing here has been validated. A `dob` of `"banana"` is faithfully
/// reported as `"banana"`; judging it is the caller's business.
///
/// Serialize-only: a record cannot be built from JSON, only parsed from a
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    layout: Layout,
    reference_id: String,
    name: String,
    dob: String,
    gender: String,
    care_of: String,
    district: String,
    landmark: String,
    house: String,
    location: String,
    pincode: String,
    state: String,
    post_office: String,
    /// Raw photo bytes, usually a JPEG-2000 codestream (versioned layout)
    /// or a JPEG (legacy layout). Hex-encoded when serialized.
    #[serde(with = "hex::serde")]
    photo_bytes: Vec<u8>,
}

impl IdentityRecord {
    /// An all-empty record for `layout`. Only the parser fills one in.
    pub(crate) fn empty(layout: Layout) -> Self {
        Self {
            layout,
            reference_id: String::new(),
            name: String::new(),
            dob: String::new(),
            gender: String::new(),
            care_of: String::new(),
            district: String::new(),
            landmark: String::new(),
            house: String::new(),
            location: String::new(),
            pincode: String::new(),
            state: String::new(),
            post_office: String::new(),
            photo_bytes: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, attribute: Attribute, value: String) {
        *self.slot_mut(attribute) = value;
    }

    pub(crate) fn set_photo(&mut self, photo_bytes: Vec<u8>) {
        self.photo_bytes = photo_bytes;
    }

    fn slot_mut(&mut self, attribute: Attribute) -> &mut String {
        match attribute {
            Attribute::ReferenceId => &mut self.reference_id,
            Attribute::Name => &mut self.name,
            Attribute::Dob => &mut self.dob,
            Attribute::Gender => &mut self.gender,
            Attribute::CareOf => &mut self.care_of,
            Attribute::District => &mut self.district,
            Attribute::Landmark => &mut self.landmark,
            Attribute::House => &mut self.house,
            Attribute::Location => &mut self.location,
            Attribute::Pincode => &mut self.pincode,
            Attribute::State => &mut self.state,
            Attribute::PostOffice => &mut self.post_office,
        }
    }

    /// Look up a text attribute by name. Always succeeds; absent means "".
    pub fn get(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::ReferenceId => &self.reference_id,
            Attribute::Name => &self.name,
            Attribute::Dob => &self.dob,
            Attribute::Gender => &self.gender,
            Attribute::CareOf => &self.care_of,
            Attribute::District => &self.district,
            Attribute::Landmark => &self.landmark,
            Attribute::House => &self.house,
            Attribute::Location => &self.location,
            Attribute::Pincode => &self.pincode,
            Attribute::State => &self.state,
            Attribute::PostOffice => &self.post_office,
        }
    }

    /// `(attribute, value)` pairs for every text attribute, in display order.
    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, &str)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Date of birth exactly as printed in the payload (typically
    /// `DD-MM-YYYY`).
    pub fn dob(&self) -> &str {
        &self.dob
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn care_of(&self) -> &str {
        &self.care_of
    }

    pub fn district(&self) -> &str {
        &self.district
    }

    pub fn landmark(&self) -> &str {
        &self.landmark
    }

    pub fn house(&self) -> &str {
        &self.house
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn pincode(&self) -> &str {
        &self.pincode
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn post_office(&self) -> &str {
        &self.post_office
    }

    pub fn photo_bytes(&self) -> &[u8] {
        &self.photo_bytes
    }

    /// Give up the record and keep the photo, e.g. to hand it to an image
    /// decoder without copying.
    pub fn into_photo_bytes(self) -> Vec<u8> {
        self.photo_bytes
    }

    pub fn photo_format(&self) -> PhotoFormat {
        PhotoFormat::detect(&self.photo_bytes)
    }
}
