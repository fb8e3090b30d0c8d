// Copyright (c) 2026 Secure QR Contributors. MIT License.
// See LICENSE for details.

//! # Secure QR Scanner
//!
//! Entry point for the `secure-qr` binary. Parses CLI arguments, initializes
//! logging, reads the numeric payload and runs it through the pipeline.
//!
//! The binary supports three subcommands:
//!
//! - `scan`    — decode, verify and parse; print a JSON report
//! - `fields`  — dump raw fields for layout debugging
//! - `version` — print build version information
//!
//! Any scan error exits non-zero with the error's machine-readable code.

mod cli;
mod logging;
mod report;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use secure_qr::config::{DecodeOptions, SIGNATURE_ALGORITHM, VERSION_TAGS};
use secure_qr::crypto::split_signature;
use secure_qr::identity::match_holder;
use secure_qr::payload::{decode_with_options, preview_fields};
use secure_qr::{scan, MatchRequest, ScanOptions};

use cli::{Commands, FieldsArgs, PayloadArgs, ScanArgs, SecureQrCli};
use report::ScanOutput;

const DEFAULT_LOG_LEVEL: &str = "secure_qr=info";

fn main() -> Result<()> {
    let cli = SecureQrCli::parse();
    logging::init_logging(DEFAULT_LOG_LEVEL, cli.log_format);

    match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Fields(args) => dump_fields(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Runs the full pipeline and prints the JSON report to stdout.
fn run_scan(args: ScanArgs) -> Result<()> {
    let payload = read_payload(&args.input)?;
    let options = ScanOptions {
        policy: args.policy,
        decode: DecodeOptions::with_max_decompressed_len(args.input.max_decompressed),
        require_trust_anchor: args.require_trust_anchor,
    };

    tracing::info!(
        digits = payload.len(),
        policy = %options.policy,
        trust_anchor = args.trust_anchor.is_some(),
        "scanning payload"
    );

    let scan_report = scan(&payload, args.trust_anchor.as_deref(), &options)
        .map_err(|e| anyhow::anyhow!("scan failed [{}]: {}", e.code(), e))?;

    let holder_match = args.has_claims().then(|| {
        let request = MatchRequest {
            name: args.name.clone().unwrap_or_default(),
            dob: args.dob.clone().unwrap_or_default(),
            last_4_digits: args.last_4_digits.clone(),
        };
        match_holder(&scan_report.record, &request)
    });

    if let Some(path) = &args.photo_out {
        fs::write(path, scan_report.record.photo_bytes())
            .with_context(|| format!("failed to write photo to {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            bytes = scan_report.record.photo_bytes().len(),
            "photo written"
        );
    }

    let output = ScanOutput::new(&scan_report, holder_match, args.photo_out.as_deref());
    let json = serde_json::to_string_pretty(&output).context("failed to serialize report")?;
    println!("{}", json);

    Ok(())
}

/// Prints every field of the signed content, one per line or as JSON.
///
/// The signature is not checked here; this is a debugging aid.
fn dump_fields(args: FieldsArgs) -> Result<()> {
    let payload = read_payload(&args.input)?;
    let options = DecodeOptions::with_max_decompressed_len(args.input.max_decompressed);

    let raw = decode_with_options(&payload, &options)
        .map_err(|e| anyhow::anyhow!("decode failed [{}]: {}", e.code(), e))?;
    let (signed_content, _) = split_signature(&raw)
        .map_err(|e| anyhow::anyhow!("split failed [{}]: {}", e.code(), e))?;
    let preview = preview_fields(signed_content);

    if args.json {
        let json = serde_json::to_string_pretty(&preview).context("failed to serialize fields")?;
        println!("{}", json);
    } else {
        println!("{} fields, {} signed bytes", preview.len(), signed_content.len());
        for field in &preview {
            println!("{:>4}  {:>6}  {}", field.index, field.len, field.text);
        }
    }

    Ok(())
}

/// Reads the numeric payload from a file, or stdin for `-`/no argument.
fn read_payload(input: &PayloadArgs) -> Result<String> {
    let text = match input.payload.as_deref() {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read payload from {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read payload from stdin")?;
            buf
        }
    };

    Ok(text.trim().to_string())
}

/// Prints version information to stdout.
fn print_version() {
    println!("secure-qr  {}", env!("CARGO_PKG_VERSION"));
    println!("signature  {}", SIGNATURE_ALGORITHM);
    println!("layouts    {} + legacy", VERSION_TAGS.join(", "));
}
