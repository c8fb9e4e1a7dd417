// src/supervise/log.rs

//! Shared, append-only record log written by the output pumps.

use std::sync::Arc;

use parking_lot::Mutex;

use super::LineRecord;

/// Clonable handle to the ordered line log.
///
/// The stdout and stderr pumps append concurrently; the supervisor
/// drains it exactly once, after every pump has been joined. Records
/// land in arrival order; no cross-stream ordering beyond that is
/// guaranteed.
#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    records: Arc<Mutex<Vec<LineRecord>>>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. The lock is scoped to the push alone.
    pub fn append(&self, record: LineRecord) {
        self.records.lock().push(record);
    }

    /// Append all records produced from one chunk under a single lock
    /// acquisition, keeping them contiguous.
    pub fn extend(&self, records: Vec<LineRecord>) {
        if records.is_empty() {
            return;
        }
        self.records.lock().extend(records);
    }

    /// Drain the log. Only meaningful once all writers are joined.
    pub fn take(&self) -> Vec<LineRecord> {
        std::mem::take(&mut *self.records.lock())
    }
}
