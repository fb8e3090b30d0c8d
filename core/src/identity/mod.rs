//! # Identity Module
//!
//! The typed result of a successful parse, and the one thing callers
//! usually do with it next: check it against what the holder claims.
//!
//! 1. **record** — [`IdentityRecord`], immutable once built. Every text
//!    attribute is a plain `String`; a field the layout lacks, or the
//!    payload is too short to carry, is the empty string, never an error.
//! 2. **matching** — compares a holder's claimed name, date of birth and
//!    last four digits against a record without echoing record values back.

pub mod matching;
pub mod record;

pub use matching::{match_holder, MatchRequest, MatchResult};
pub use record::{Attribute, IdentityRecord};
