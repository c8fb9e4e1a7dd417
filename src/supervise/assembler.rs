// src/supervise/assembler.rs

//! Reassembles raw pipe chunks into timestamped line records.
//!
//! Pipes deliver bytes at arbitrary chunk boundaries, so a logical line
//! may arrive split across several reads. The assembler carries the
//! in-progress tail between [`LineAssembler::feed`] calls and emits a
//! record only when a line terminates (or the stream closes).

use std::time::Instant;

use super::{LineRecord, StreamKind};

/// Per-stream line assembler.
///
/// One instance per output pump; never shared across streams.
#[derive(Debug)]
pub struct LineAssembler {
    kind: StreamKind,
    partial: Vec<u8>,
    opened_at: Option<Instant>,
}

impl LineAssembler {
    pub fn new(kind: StreamKind) -> Self {
        Self {
            kind,
            partial: Vec::new(),
            opened_at: None,
        }
    }

    /// Split one raw chunk into complete line records.
    ///
    /// A line spanning multiple chunks keeps the timestamp of the chunk
    /// that opened it, so the record reflects when the line started to
    /// appear rather than when a later chunk happened to terminate it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<LineRecord> {
        let mut records = Vec::new();
        let segments: Vec<&[u8]> = chunk.split(|&b| b == b'\n').collect();

        if segments.len() == 1 {
            // No newline in the chunk: extend the partial line, opening
            // it if this is its first byte.
            if self.partial.is_empty() {
                self.opened_at = Some(Instant::now());
            }
            self.partial.extend_from_slice(segments[0]);
            return records;
        }

        let mut first = 0;
        if !self.partial.is_empty() {
            // The first newline terminates the carried partial line.
            let at = self.opened_at.take().unwrap_or_else(Instant::now);
            let mut bytes = std::mem::take(&mut self.partial);
            bytes.extend_from_slice(segments[0]);
            records.push(LineRecord {
                kind: self.kind,
                at,
                bytes,
            });
            first = 1;
        }

        // Segments strictly between the first and last newline are
        // complete lines of their own, empty ones included.
        let last = segments.len() - 1;
        for segment in &segments[first..last] {
            records.push(LineRecord {
                kind: self.kind,
                at: Instant::now(),
                bytes: segment.to_vec(),
            });
        }

        // Bytes after the last newline open a fresh partial line.
        if !segments[last].is_empty() {
            self.partial.extend_from_slice(segments[last]);
            self.opened_at = Some(Instant::now());
        }

        records
    }

    /// Emit the trailing unterminated line, if any. Called once on EOF.
    pub fn flush(&mut self) -> Option<LineRecord> {
        if self.partial.is_empty() {
            return None;
        }
        let at = self.opened_at.take().unwrap_or_else(Instant::now);
        Some(LineRecord {
            kind: self.kind,
            at,
            bytes: std::mem::take(&mut self.partial),
        })
    }
}
