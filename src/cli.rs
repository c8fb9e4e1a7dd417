// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `muffle`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "muffle",
    version,
    about = "Run COMMAND with its output muffled and SUMMARY shown instead.",
    long_about = "Run COMMAND with its output muffled and SUMMARY shown instead.\n\
        If COMMAND fails, its full output is shown. With no COMMAND, shell\n\
        commands are read from stdin and run through your shell."
)]
pub struct CliArgs {
    /// Additionally write the report to FILE (append, no color).
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Show output regardless of error state.
    #[arg(short = 'a', long)]
    pub always_output: bool,

    /// Suppress color.
    #[arg(long)]
    pub no_color: bool,

    /// Suppress info (command, exit code, duration).
    #[arg(long)]
    pub no_info: bool,

    /// Suppress timestamps.
    #[arg(long)]
    pub no_timestamps: bool,

    /// Diagnostics level on stderr (error, warn, info, debug, trace).
    ///
    /// If omitted, `MUFFLE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Summary line shown while the command runs.
    #[arg(value_name = "SUMMARY")]
    pub summary: String,

    /// Command to run; shell commands are read from stdin when absent.
    ///
    /// Everything after SUMMARY is passed through untouched, so the
    /// command's own flags don't need a `--` separator.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
