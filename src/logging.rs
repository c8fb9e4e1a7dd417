// src/logging.rs

//! Diagnostics via `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `MUFFLE_LOG` environment variable (an `EnvFilter` directive)
//! 3. default to `warn`
//!
//! Diagnostics go to STDERR; stdout carries the summary/report UI and
//! stays quiet unless asked for.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Initialise the global subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(directive(level)),
        None => EnvFilter::try_from_env("MUFFLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
