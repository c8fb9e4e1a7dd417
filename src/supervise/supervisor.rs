// src/supervise/supervisor.rs

//! Spawns and supervises one child process to completion.

use std::process::Stdio;
use std::time::Instant;

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, warn};

use super::latch::SignalLatch;
use super::log::ResultLog;
use super::pump;
use super::{
    Invocation, LineRecord, ProcessResult, Progress, SUPERVISION_FAILURE_CODE, StreamKind,
    WAIT_POLL,
};

/// Runs one child process and collects its output into a
/// [`ProcessResult`].
///
/// The supervisor owns no global state: the latch is injected, so
/// several supervisors can run in one process and tests can cancel
/// without delivering real signals.
pub struct Supervisor {
    latch: SignalLatch,
}

impl Supervisor {
    pub fn new(latch: SignalLatch) -> Self {
        Self { latch }
    }

    /// Run `invocation` to completion.
    ///
    /// Never fails: spawn errors, received signals, and supervision
    /// errors are all folded into the result as synthetic stderr
    /// records plus an exit code. Every started pump is joined before
    /// this returns, on every path.
    pub async fn run(&self, invocation: Invocation, progress: &mut dyn Progress) -> ProcessResult {
        let started = Instant::now();
        let payload = invocation.stdin_payload();

        let mut command = Command::new(invocation.program());
        command
            .args(invocation.command.iter().skip(1))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Shell mode replays the pre-buffered text; otherwise the child
        // reads the caller's stdin directly.
        if payload.is_some() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::inherit());
        }

        debug!(command = ?invocation.command, shell = payload.is_some(), "spawning child");

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => return spawn_failed(invocation, started, err),
        };

        let log = ResultLog::new();
        let mut pumps: Vec<JoinHandle<()>> = Vec::with_capacity(3);

        if let Some(payload) = payload {
            if let Some(stdin) = child.stdin.take() {
                pumps.push(tokio::spawn(pump::pump_input(
                    stdin,
                    payload,
                    self.latch.clone(),
                )));
            }
        }
        if let Some(stdout) = child.stdout.take() {
            pumps.push(tokio::spawn(pump::pump_output(
                StreamKind::Stdout,
                stdout,
                log.clone(),
                self.latch.clone(),
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(tokio::spawn(pump::pump_output(
                StreamKind::Stderr,
                stderr,
                log.clone(),
                self.latch.clone(),
            )));
        }

        let exit_code = self.wait(&mut child, &log, progress).await;

        // Finalize: every pump joins on every path, so the log is fully
        // populated and all pipe ends are closed before it is read.
        for pump in pumps {
            if pump.await.is_err() {
                warn!("a stream pump panicked before completing");
            }
        }

        let ended = Instant::now();
        ProcessResult {
            command: invocation.command,
            shell_commands: invocation.shell_commands,
            lines: log.take(),
            started,
            ended,
            exit_code,
            errored: exit_code != 0,
            not_found: false,
        }
    }

    /// Poll-wait for the child, ticking the progress callback and
    /// observing the latch between polls.
    async fn wait(&self, child: &mut Child, log: &ResultLog, progress: &mut dyn Progress) -> i32 {
        loop {
            match time::timeout(WAIT_POLL, child.wait()).await {
                Ok(Ok(status)) => {
                    progress.finish();
                    // A signal that raced the exit still wins: the
                    // caller's exit code reflects the interruption.
                    if let Some(signum) = self.latch.get() {
                        return self.interrupt(child, log, signum);
                    }
                    return exit_code_of(status);
                }
                Ok(Err(err)) => {
                    log.append(LineRecord::note(
                        StreamKind::Stderr,
                        format!("Supervision error: {err}"),
                    ));
                    terminate(child);
                    return SUPERVISION_FAILURE_CODE;
                }
                Err(_elapsed) => {
                    progress.tick();
                    if let Some(signum) = self.latch.get() {
                        return self.interrupt(child, log, signum);
                    }
                }
            }
        }
    }

    fn interrupt(&self, child: &mut Child, log: &ResultLog, signum: i32) -> i32 {
        terminate(child);
        log.append(LineRecord::note(
            StreamKind::Stderr,
            format!("Received signal: {}", signal_name(signum)),
        ));
        -signum
    }
}

fn spawn_failed(invocation: Invocation, started: Instant, err: std::io::Error) -> ProcessResult {
    let not_found = matches!(
        err.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
    );
    let message = if not_found {
        format!("Command not found: {}", invocation.program())
    } else {
        format!("Cannot run {}: {}", invocation.program(), err)
    };
    debug!(program = invocation.program(), error = %err, "spawn failed");

    ProcessResult {
        lines: vec![LineRecord::note(StreamKind::Stderr, message)],
        started,
        ended: Instant::now(),
        exit_code: 1,
        errored: true,
        not_found,
        command: invocation.command,
        shell_commands: invocation.shell_commands,
    }
}

/// Ask the child to terminate. A request (SIGTERM), not a kill: the
/// child gets a chance to clean up, and the pumps drain whatever it
/// writes on the way out.
#[cfg(unix)]
fn terminate(child: &mut Child) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        if let Err(err) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            debug!(pid, error = %err, "failed to signal child");
        }
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        debug!(error = %err, "failed to kill child");
    }
}

fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => signal_exit_code(status),
    }
}

#[cfg(unix)]
fn signal_exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|signum| -signum).unwrap_or(-1)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: std::process::ExitStatus) -> i32 {
    -1
}

#[cfg(unix)]
fn signal_name(signum: i32) -> String {
    match nix::sys::signal::Signal::try_from(signum) {
        Ok(signal) => signal.as_str().to_string(),
        Err(_) => signum.to_string(),
    }
}

#[cfg(not(unix))]
fn signal_name(signum: i32) -> String {
    signum.to_string()
}
