// src/config.rs

//! Resolve CLI arguments and the environment into a run configuration.

use std::path::PathBuf;

use crate::cli::CliArgs;

/// Interpreter used in shell mode when neither `MUFFLE_SHELL` nor
/// `SHELL` is set.
const DEFAULT_SHELL: &str = "/bin/bash";

/// Fully resolved invocation configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub summary: String,
    /// Executable and arguments; in shell mode this is the interpreter.
    pub command: Vec<String>,
    /// True when COMMAND was absent and stdin will be replayed to a
    /// shell interpreter.
    pub shell: bool,
    /// `MUFFLE_SHELL_ENV`, replayed as a setup line before the shell
    /// text.
    pub shell_env: Option<String>,
    pub log_file: Option<PathBuf>,
    pub always_output: bool,
    pub color: bool,
    pub info: bool,
    pub timestamps: bool,
}

impl Config {
    /// Resolve from the real process environment.
    pub fn resolve(args: CliArgs) -> Self {
        Self::resolve_from(args, |name| std::env::var(name).ok())
    }

    /// Resolve with an injectable environment lookup (tests).
    pub fn resolve_from(args: CliArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let (command, shell) = if args.command.is_empty() {
            let interpreter = env("MUFFLE_SHELL")
                .or_else(|| env("SHELL"))
                .unwrap_or_else(|| DEFAULT_SHELL.to_string());
            (vec![interpreter], true)
        } else {
            (args.command, false)
        };

        Config {
            summary: args.summary,
            command,
            shell,
            shell_env: env("MUFFLE_SHELL_ENV"),
            log_file: args.log,
            always_output: args.always_output,
            color: !args.no_color,
            info: !args.no_info,
            timestamps: !args.no_timestamps,
        }
    }
}
