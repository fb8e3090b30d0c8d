//! # Scan Reports
//!
//! The JSON document `secure-qr scan` prints. It is deliberately flatter than
//! [`secure_qr::ScanReport`]: text attributes in a map, the photo summarized
//! rather than hex-dumped, and a timestamp so saved reports can be ordered.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use secure_qr::crypto::sha256_hex;
use secure_qr::payload::PhotoFormat;
use secure_qr::{MatchResult, ScanReport, TrustStatus};

/// Summary of the embedded photo.
#[derive(Debug, Serialize)]
pub struct PhotoSummary {
    pub len: usize,
    pub format: PhotoFormat,
    pub extension: &'static str,
    /// SHA-256 of the raw bytes, for correlating with a saved photo file.
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
}

/// The report printed on stdout.
#[derive(Debug, Serialize)]
pub struct ScanOutput<'a> {
    pub scanned_at: DateTime<Utc>,
    pub layout: String,
    pub trust: &'a TrustStatus,
    pub fields: BTreeMap<&'static str, &'a str>,
    pub photo: PhotoSummary,
    pub raw_len: usize,
    pub signed_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_match: Option<MatchResult>,
}

impl<'a> ScanOutput<'a> {
    pub fn new(
        report: &'a ScanReport,
        holder_match: Option<MatchResult>,
        photo_path: Option<&Path>,
    ) -> Self {
        let record = &report.record;
        let photo = record.photo_bytes();
        let format = record.photo_format();

        Self {
            scanned_at: Utc::now(),
            layout: record.layout().to_string(),
            trust: &report.trust,
            fields: record
                .attributes()
                .map(|(attribute, value)| (attribute.as_str(), value))
                .collect(),
            photo: PhotoSummary {
                len: photo.len(),
                format,
                extension: format.extension(),
                sha256: sha256_hex(photo),
                written_to: photo_path.map(|p| p.display().to_string()),
            },
            raw_len: report.raw_len,
            signed_len: report.signed_len,
            holder_match,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secure_qr::{scan, ScanOptions};

    const PAYLOAD: &str = include_str!("../../core/tests/fixtures/v3_signed_payload.txt");

    #[test]
    fn report_shape() {
        let report = scan(PAYLOAD.trim(), None, &ScanOptions::default()).unwrap();
        let output = ScanOutput::new(&report, None, Some(Path::new("/tmp/photo.j2k")));
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["layout"], "versioned(V3)");
        assert_eq!(json["trust"]["status"], "skipped");
        assert_eq!(json["fields"]["name"], "RAMESH KUMAR");
        assert_eq!(json["fields"]["post_office"], "Bangalore GPO");
        assert_eq!(json["photo"]["len"], 291);
        assert_eq!(json["photo"]["format"], "jpeg2000_codestream");
        assert_eq!(json["photo"]["written_to"], "/tmp/photo.j2k");
        assert!(json.get("holder_match").is_none());
        assert!(json["scanned_at"].is_string());
    }
}
