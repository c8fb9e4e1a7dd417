// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod render;
pub mod supervise;

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::Config;
use crate::errors::{MuffleError, Result};
use crate::render::{NoopProgress, NoopSink, RealSink, Sink, Spinner};
use crate::supervise::{Invocation, Progress, SignalLatch, Supervisor, latch, pump};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI + environment)
/// - signal latch installation
/// - sinks (stdout, optional log file) and the spinner
/// - the process supervisor
///
/// Returns the exit code this process should exit with: the child's
/// own code, or the supervision core's synthetic one (see the exit-code
/// contract on `supervise::ProcessResult`).
pub async fn run(args: CliArgs) -> Result<i32> {
    let config = Config::resolve(args);
    debug!(?config, "resolved configuration");

    let latch = SignalLatch::new();
    latch::install(&latch)?;

    let tty = io::stdout().is_terminal();
    let color = config.color && tty;

    let mut out = RealSink::new(io::stdout(), color);
    let mut file_sink: Box<dyn Sink> = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| MuffleError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            Box::new(RealSink::new(file, false))
        }
        None => Box::new(NoopSink),
    };

    if !config.summary.is_empty() {
        out.summary(&config.summary)?;
        file_sink.summary(&config.summary)?;
    }

    // Shell mode buffers the caller's stdin in full before the child is
    // spawned; the child never reads our stdin directly.
    let shell_commands = if config.shell {
        Some(pump::slurp(tokio::io::stdin(), &latch).await?)
    } else {
        None
    };

    let invocation = Invocation {
        command: config.command.clone(),
        shell_commands,
        shell_env: config.shell_env.clone(),
    };

    let mut progress: Box<dyn Progress> = if !config.summary.is_empty() && tty {
        Box::new(Spinner::new(io::stdout()))
    } else {
        Box::new(NoopProgress)
    };

    let result = Supervisor::new(latch)
        .run(invocation, progress.as_mut())
        .await;

    if !config.summary.is_empty() {
        if result.errored {
            out.failed()?;
            file_sink.failed()?;
        } else {
            out.passed()?;
            file_sink.passed()?;
        }
    }

    if config.always_output || result.errored {
        out.report(&result, config.info, config.timestamps)?;
    }
    file_sink.report(&result, config.info, config.timestamps)?;

    Ok(result.exit_code)
}
