//! # CLI Interface
//!
//! Defines the command-line argument structure for `secure-qr` using
//! `clap` derive. Supports three subcommands: `scan`, `fields`, and
//! `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use secure_qr::config::DEFAULT_MAX_DECOMPRESSED_LEN;
use secure_qr::SignaturePolicy;

use crate::logging::LogFormat;

/// Secure QR identity payload scanner.
///
/// Decodes the numeric string read from a Secure QR code, checks its
/// signature against the issuing authority's certificate, and prints the
/// identity record as JSON.
#[derive(Parser, Debug)]
#[command(
    name = "secure-qr",
    about = "Decode and verify Secure QR identity payloads",
    version,
    propagate_version = true
)]
pub struct SecureQrCli {
    /// Log output format. Logs always go to stderr.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "SECURE_QR_LOG_FORMAT",
        default_value = "pretty"
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `secure-qr` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode, verify and parse a payload; print a JSON report.
    Scan(ScanArgs),
    /// Dump the raw 0xFF-delimited fields of a payload, for diagnosing
    /// unfamiliar layouts.
    Fields(FieldsArgs),
    /// Print version information and exit.
    Version,
}

/// Where the payload comes from and how big it may get.
#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// File holding the numeric payload. Reads stdin when omitted or `-`.
    pub payload: Option<PathBuf>,

    /// Refuse payloads that decompress to more than this many bytes.
    #[arg(long, env = "SECURE_QR_MAX_DECOMPRESSED", default_value_t = DEFAULT_MAX_DECOMPRESSED_LEN)]
    pub max_decompressed: usize,
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub input: PayloadArgs,

    /// Issuing authority certificate (PEM or DER).
    ///
    /// Without one the signature is not checked and the report says so.
    #[arg(long, short = 't', env = "SECURE_QR_TRUST_ANCHOR")]
    pub trust_anchor: Option<PathBuf>,

    /// What a failed signature check does: `enforce` aborts, `warn` reports
    /// and carries on.
    #[arg(long, env = "SECURE_QR_POLICY", default_value = "warn")]
    pub policy: SignaturePolicy,

    /// Fail instead of scanning when no trust anchor is configured.
    #[arg(long)]
    pub require_trust_anchor: bool,

    /// Holder's claimed name, matched case-insensitively.
    #[arg(long)]
    pub name: Option<String>,

    /// Holder's claimed date of birth, as printed on the card.
    #[arg(long)]
    pub dob: Option<String>,

    /// Last four digits of the holder's identity number.
    #[arg(long = "last4")]
    pub last_4_digits: Option<String>,

    /// Write the raw photo bytes to this file.
    #[arg(long)]
    pub photo_out: Option<PathBuf>,
}

impl ScanArgs {
    /// Whether any holder claim was given, i.e. whether to run matching.
    pub fn has_claims(&self) -> bool {
        self.name.is_some() || self.dob.is_some() || self.last_4_digits.is_some()
    }
}

/// Arguments for the `fields` subcommand.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub input: PayloadArgs,

    /// Print the dump as JSON instead of aligned text.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        SecureQrCli::command().debug_assert();
    }

    #[test]
    fn scan_args_parse() {
        let cli = SecureQrCli::try_parse_from([
            "secure-qr",
            "scan",
            "payload.txt",
            "--trust-anchor",
            "authority.pem",
            "--policy",
            "enforce",
            "--last4",
            "1234",
        ])
        .unwrap();

        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.input.payload, Some(PathBuf::from("payload.txt")));
        assert_eq!(args.trust_anchor, Some(PathBuf::from("authority.pem")));
        assert_eq!(args.policy, SignaturePolicy::Enforce);
        assert_eq!(args.last_4_digits.as_deref(), Some("1234"));
        assert!(args.has_claims());
    }

    #[test]
    fn unknown_policy_rejected() {
        let result = SecureQrCli::try_parse_from(["secure-qr", "scan", "--policy", "sometimes"]);
        assert!(result.is_err());
    }

    #[test]
    fn fields_reads_stdin_by_default() {
        let cli = SecureQrCli::try_parse_from(["secure-qr", "fields", "--json"]).unwrap();
        let Commands::Fields(args) = cli.command else {
            panic!("expected fields");
        };
        assert!(args.input.payload.is_none());
        assert!(args.json);
    }
}
