// src/supervise/pump.rs

//! Worker loops that move bytes between the child's pipes and the log.
//!
//! Each pump owns one pipe end and runs as its own Tokio task, so a
//! child filling both output pipes at once cannot deadlock the
//! supervisor. Pumps never fail past their own boundary: pipe errors
//! end the loop the same way EOF does, and the pipe is released when
//! the pump returns.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use super::assembler::LineAssembler;
use super::latch::SignalLatch;
use super::log::ResultLog;
use super::{READ_CHUNK, StreamKind, WRITE_CHUNK};

/// Read loop for one output stream.
///
/// Reads fixed-size chunks, assembles them into line records, and
/// appends them to the shared log under its lock. Stops on EOF, read
/// error, or a latched signal. On EOF (and on error, which is treated
/// as EOF) the trailing partial line is flushed into the log; a latched
/// signal abandons the tail so the pump stops promptly.
pub async fn pump_output(
    kind: StreamKind,
    mut pipe: impl AsyncRead + Unpin,
    log: ResultLog,
    latch: SignalLatch,
) {
    let mut assembler = LineAssembler::new(kind);
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        if latch.is_set() {
            debug!(?kind, "output pump stopping on latched signal");
            return;
        }
        match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => log.extend(assembler.feed(&buf[..n])),
            Err(err) => {
                debug!(?kind, error = %err, "output pipe read failed; treating as EOF");
                break;
            }
        }
    }

    if let Some(trailing) = assembler.flush() {
        log.append(trailing);
    }
}

/// Write loop feeding the pre-buffered shell text to the child's stdin.
///
/// Writes bounded chunks so the latch is observed between writes even
/// for large payloads, and shuts the pipe down however the loop ends so
/// the child always sees EOF.
pub async fn pump_input(mut pipe: impl AsyncWrite + Unpin, payload: Vec<u8>, latch: SignalLatch) {
    for chunk in payload.chunks(WRITE_CHUNK) {
        if latch.is_set() {
            debug!("input pump stopping on latched signal");
            break;
        }
        if let Err(err) = pipe.write_all(chunk).await {
            debug!(error = %err, "stdin pipe write failed; stopping");
            break;
        }
    }
    let _ = pipe.shutdown().await;
}

/// Buffer the calling process's stdin in full (shell mode, pre-spawn).
///
/// Returns whatever was read before EOF or a latched signal; the child
/// never reads the original stdin in shell mode.
pub async fn slurp(
    mut input: impl AsyncRead + Unpin,
    latch: &SignalLatch,
) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK];
    while !latch.is_set() {
        match input.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
            Err(err) => return Err(err),
        }
    }
    Ok(buffer)
}
