//! # Holder Matching
//!
//! A decoded record proves what the card says. Whether the person in front
//! of you *is* that card holder is a separate question, answered by
//! comparing what they claim against the record:
//!
//! - **name** — trimmed, case-insensitive equality;
//! - **date of birth** — trimmed, exact equality (same `DD-MM-YYYY` format);
//! - **last four digits** of the identity number — the versioned reference
//!   id begins with them.
//!
//! The result only says *which* checks passed. It never carries the record's
//! values, so a failed match cannot be used to fish for the right answer.

use serde::{Deserialize, Serialize};

use super::record::IdentityRecord;

/// Number of leading reference-id characters that mirror the identity
/// number's last digits.
const LAST_DIGITS_LEN: usize = 4;

/// What the holder claims about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub name: String,
    pub dob: String,
    /// Last four digits of the identity number. `None` never matches.
    pub last_4_digits: Option<String>,
}

/// Which of the holder's claims the record backs up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub name_matched: bool,
    pub dob_matched: bool,
    pub last_4_matched: bool,
}

impl MatchResult {
    /// All three checks passed.
    pub fn is_full_match(&self) -> bool {
        self.name_matched && self.dob_matched && self.last_4_matched
    }
}

/// Compare a holder's claims against a decoded record.
///
/// # Example
///
/// ```
/// use secure_qr::identity::{match_holder, MatchRequest};
/// # use secure_qr::payload::parse;
/// # let content = b"V3\xff3\xff123420190101\xffRamesh Kumar\xff01-01-1990\xffM";
/// # let record = parse(content).unwrap();
///
/// let request = MatchRequest {
///     name: "  ramesh kumar ".into(),
///     dob: "01-01-1990".into(),
///     last_4_digits: Some("1234".into()),
/// };
/// assert!(match_holder(&record, &request).is_full_match());
/// ```
pub fn match_holder(record: &IdentityRecord, request: &MatchRequest) -> MatchResult {
    let name_matched = record.name().trim().to_lowercase() == request.name.trim().to_lowercase();
    let dob_matched = record.dob().trim() == request.dob.trim();

    let last_4_matched = match (request.last_4_digits.as_deref(), last_digits(record)) {
        (Some(claimed), Some(actual)) => {
            let claimed = claimed.trim();
            !claimed.is_empty() && claimed == actual
        }
        _ => false,
    };

    let result = MatchResult {
        name_matched,
        dob_matched,
        last_4_matched,
    };
    tracing::debug!(
        name_matched,
        dob_matched,
        last_4_matched,
        "holder match evaluated"
    );
    result
}

/// The first four characters of the reference id, if it has that many.
fn last_digits(record: &IdentityRecord) -> Option<&str> {
    let reference_id = record.reference_id();
    let (end, _) = reference_id.char_indices().nth(LAST_DIGITS_LEN - 1)?;
    let end = end + reference_id[end..].chars().next()?.len_utf8();
    Some(&reference_id[..end])
}
