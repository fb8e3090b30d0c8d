//! # Scan Pipeline
//!
//! Decode → verify → parse, in that order, under a caller-chosen policy.
//!
//! The verifier only *reports*; this module is where the report turns into a
//! decision. Two knobs:
//!
//! - [`SignaturePolicy`]: with `WarnAndContinue` (the default) a signature
//!   that fails is logged and the record is still returned, marked
//!   [`TrustStatus::Failed`]. With `Enforce` it becomes
//!   [`ScanError::SignatureRejected`] and no record is produced.
//! - `require_trust_anchor`: without an anchor there is nothing to verify
//!   against. By default that is logged and the scan continues as
//!   [`TrustStatus::Skipped`]; when required, it is
//!   [`ScanError::TrustAnchorRequired`].
//!
//! "Skipped" is never reported as "verified". Callers that only look at
//! [`TrustStatus::is_verified`] get the safe answer.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DecodeOptions;
use crate::crypto::{split_signature, verify_with_anchor, TrustAnchor};
use crate::error::SecureQrError;
use crate::identity::IdentityRecord;
use crate::payload::{decode_with_options, parse};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// What to do when a signature does not verify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignaturePolicy {
    /// A failed signature aborts the scan.
    Enforce,
    /// A failed signature is logged and surfaced in the report.
    #[default]
    WarnAndContinue,
}

impl SignaturePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignaturePolicy::Enforce => "enforce",
            SignaturePolicy::WarnAndContinue => "warn",
        }
    }
}

impl fmt::Display for SignaturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignaturePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enforce" => Ok(SignaturePolicy::Enforce),
            "warn" | "warn_and_continue" | "warn-and-continue" => {
                Ok(SignaturePolicy::WarnAndContinue)
            }
            other => Err(format!(
                "unknown signature policy '{}', expected 'enforce' or 'warn'",
                other
            )),
        }
    }
}

/// Options for one [`scan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    pub policy: SignaturePolicy,
    pub decode: DecodeOptions,
    /// Refuse to scan at all without a trust anchor.
    pub require_trust_anchor: bool,
}

impl ScanOptions {
    /// Strict settings: anchor required, failures fatal.
    pub fn strict() -> Self {
        Self {
            policy: SignaturePolicy::Enforce,
            decode: DecodeOptions::default(),
            require_trust_anchor: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// How far the payload's origin could be established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrustStatus {
    /// The signature verified against the anchor with this fingerprint.
    Verified {
        detail: String,
        anchor_fingerprint: String,
    },
    /// The signature was checked and did not verify.
    Failed { detail: String },
    /// No anchor was supplied, so the signature was never checked.
    Skipped,
}

impl TrustStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, TrustStatus::Verified { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrustStatus::Verified { .. } => "verified",
            TrustStatus::Failed { .. } => "failed",
            TrustStatus::Skipped => "skipped",
        }
    }
}

/// Everything one scan produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub record: IdentityRecord,
    pub trust: TrustStatus,
    /// Decompressed payload size, signature included.
    pub raw_len: usize,
    /// Size of the signed content the record was parsed from.
    pub signed_len: usize,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a scan produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Decoding, splitting, parsing or anchor loading failed.
    #[error(transparent)]
    Payload(#[from] SecureQrError),

    /// The signature did not verify and the policy is `Enforce`.
    #[error("signature rejected: {0}")]
    SignatureRejected(String),

    /// No trust anchor was supplied but one is required.
    #[error("a trust anchor is required but none was configured")]
    TrustAnchorRequired,
}

impl ScanError {
    /// Stable, machine-readable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ScanError::Payload(e) => e.code(),
            ScanError::SignatureRejected(_) => "signature_rejected",
            ScanError::TrustAnchorRequired => "trust_anchor_required",
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

enum AnchorSource<'a> {
    Path(&'a Path),
    Loaded(&'a TrustAnchor),
    Absent,
}

/// Scan a payload, loading the trust anchor (if any) from disk.
///
/// The anchor file is read only after the payload has decoded, so a garbage
/// payload is reported as such regardless of the anchor.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use secure_qr::{scan, ScanOptions};
///
/// let payload = std::fs::read_to_string("payload.txt").unwrap();
/// let report = scan(payload.trim(), Some(Path::new("authority.cer")), &ScanOptions::default())
///     .unwrap();
/// if !report.trust.is_verified() {
///     eprintln!("unverified record: {}", report.trust.label());
/// }
/// ```
pub fn scan(
    payload: &str,
    trust_anchor_path: Option<&Path>,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let source = match trust_anchor_path {
        Some(path) => AnchorSource::Path(path),
        None => AnchorSource::Absent,
    };
    run(payload, source, options)
}

/// Scan a payload against an already-loaded trust anchor.
pub fn scan_with_anchor(
    payload: &str,
    anchor: Option<&TrustAnchor>,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let source = match anchor {
        Some(anchor) => AnchorSource::Loaded(anchor),
        None => AnchorSource::Absent,
    };
    run(payload, source, options)
}

fn run(
    payload: &str,
    source: AnchorSource<'_>,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    if matches!(source, AnchorSource::Absent) && options.require_trust_anchor {
        return Err(ScanError::TrustAnchorRequired);
    }

    let raw = decode_with_options(payload, &options.decode)?;
    let (signed_content, signature) = split_signature(&raw)?;

    let trust = match source {
        AnchorSource::Path(path) => {
            let anchor = TrustAnchor::load(path)?;
            evaluate(signed_content, signature, &anchor)
        }
        AnchorSource::Loaded(anchor) => evaluate(signed_content, signature, anchor),
        AnchorSource::Absent => {
            tracing::warn!("no trust anchor configured, payload signature NOT checked");
            TrustStatus::Skipped
        }
    };

    if let TrustStatus::Failed { detail } = &trust {
        match options.policy {
            SignaturePolicy::Enforce => {
                tracing::warn!(%detail, "signature check failed, rejecting payload");
                return Err(ScanError::SignatureRejected(detail.clone()));
            }
            SignaturePolicy::WarnAndContinue => {
                tracing::warn!(%detail, "signature check failed, continuing per policy");
            }
        }
    }

    let record = parse(signed_content)?;

    Ok(ScanReport {
        record,
        trust,
        raw_len: raw.len(),
        signed_len: signed_content.len(),
    })
}

fn evaluate(signed_content: &[u8], signature: &[u8], anchor: &TrustAnchor) -> TrustStatus {
    let outcome = verify_with_anchor(signed_content, signature, anchor);
    if outcome.authentic {
        let anchor_fingerprint = anchor.fingerprint();
        tracing::info!(
            anchor = %anchor_fingerprint,
            subject = %anchor.subject(),
            "payload signature verified"
        );
        TrustStatus::Verified {
            detail: outcome.detail,
            anchor_fingerprint,
        }
    } else {
        TrustStatus::Failed {
            detail: outcome.detail,
        }
    }
}
