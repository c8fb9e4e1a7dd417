// src/supervise/mod.rs

//! Process supervision core.
//!
//! Supervises exactly one child process per invocation:
//! - spawn with stdin/stdout/stderr pipes,
//! - pump the pipes concurrently (no deadlock when both output pipes
//!   fill), reassembling raw chunks into timestamped [`LineRecord`]s,
//! - poll-wait with a progress callback, observing the [`SignalLatch`]
//!   on every tick and forwarding termination to the child,
//! - join every pump before the ordered log is read.
//!
//! Within one stream, records are strictly time-ordered. Across streams
//! the interleave follows arrival order into the shared log; the exact
//! order under concurrent writes is unspecified and timing-dependent.

use std::time::{Duration, Instant};

pub mod assembler;
pub mod latch;
pub mod log;
pub mod pump;
pub mod supervisor;

pub use assembler::LineAssembler;
pub use latch::SignalLatch;
pub use log::ResultLog;
pub use supervisor::Supervisor;

/// Read size for output pipes and the shell-mode stdin slurp.
pub const READ_CHUNK: usize = 4096;

/// Write size for the stdin pump; large payloads are split into bounded
/// writes so the latch is observed between chunks.
pub const WRITE_CHUNK: usize = 4096;

/// Poll interval of the supervisor's wait loop. Also bounds how long a
/// latched signal can go unobserved.
pub const WAIT_POLL: Duration = Duration::from_millis(400);

/// Exit code reported when supervision itself fails unexpectedly.
pub const SUPERVISION_FAILURE_CODE: i32 = -2;

/// Which child stream a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// One newline-delimited output unit: stream tag, the instant the line
/// started appearing, and its payload without the trailing newline.
#[derive(Debug, Clone)]
pub struct LineRecord {
    pub kind: StreamKind,
    pub at: Instant,
    pub bytes: Vec<u8>,
}

impl LineRecord {
    /// Synthetic record carrying a supervision message (spawn failure,
    /// received signal), stamped now.
    pub fn note(kind: StreamKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            at: Instant::now(),
            bytes: text.into().into_bytes(),
        }
    }
}

/// What to run: the argument vector, plus the pre-buffered shell text
/// when the command is a shell interpreter replaying the caller's stdin.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Executable and arguments; the executable is the first element.
    pub command: Vec<String>,
    /// Shell-mode text slurped from the caller's stdin before spawning.
    pub shell_commands: Option<Vec<u8>>,
    /// Optional environment-setup line replayed ahead of the shell text.
    pub shell_env: Option<String>,
}

impl Invocation {
    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// Bytes to feed the child's stdin: the setup line (possibly empty),
    /// a newline, then the shell text verbatim. `None` when there is no
    /// shell text, in which case the child inherits the caller's stdin.
    pub(crate) fn stdin_payload(&self) -> Option<Vec<u8>> {
        let commands = self.shell_commands.as_ref()?;
        if commands.is_empty() {
            return None;
        }
        let mut payload = self.shell_env.clone().unwrap_or_default().into_bytes();
        payload.push(b'\n');
        payload.extend_from_slice(commands);
        Some(payload)
    }
}

/// Outcome of one supervised invocation. Immutable once built; the
/// rendering layer consumes it and the process exits with `exit_code`.
///
/// A negative `exit_code` encodes "terminated by signal N" as `-N`;
/// [`SUPERVISION_FAILURE_CODE`] encodes an internal supervision failure.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub command: Vec<String>,
    pub shell_commands: Option<Vec<u8>>,
    pub lines: Vec<LineRecord>,
    pub started: Instant,
    pub ended: Instant,
    pub exit_code: i32,
    pub errored: bool,
    pub not_found: bool,
}

impl ProcessResult {
    pub fn duration(&self) -> Duration {
        self.ended.duration_since(self.started)
    }
}

/// Progress feedback invoked from the supervisor's wait loop.
///
/// `tick` fires on every poll timeout while the child is still running;
/// `finish` fires once when the child has exited normally. `Send` so a
/// supervisor holding one can itself be spawned as a task.
pub trait Progress: Send {
    fn tick(&mut self);
    fn finish(&mut self);
}
