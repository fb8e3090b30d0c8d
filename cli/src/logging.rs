//! # Structured Logging
//!
//! Initializes the `tracing` subscriber with configurable format (JSON or
//! pretty-printed) and environment-based filtering via `RUST_LOG`.
//!
//! All log output is written to stderr so that stdout carries nothing but
//! the report, and `secure-qr scan ... | jq` keeps working.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored output. Suitable for interactive use.
    Pretty,
    /// Machine-parseable JSON lines. Suitable for log aggregation.
    Json,
}

/// Initialize the global tracing subscriber.
///
/// Call this exactly once, early in `main()`. Subsequent calls will panic.
///
/// # Arguments
///
/// * `default_level` - The default log level when `RUST_LOG` is not set.
///   Typical values: `"warn"`, `"secure_qr=debug"`.
/// * `format` - Output format (JSON or pretty-printed).
///
/// # Environment
///
/// The `RUST_LOG` environment variable overrides `default_level` when set.
/// Syntax follows the `tracing_subscriber::EnvFilter` directives, e.g.:
///
/// ```text
/// RUST_LOG=secure_qr=debug
/// ```
pub fn init_logging(default_level: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(false),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
    }

    tracing::debug!("logging initialized (format={:?})", format);
}
