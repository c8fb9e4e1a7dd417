// src/supervise/latch.rs

//! Cooperative cancellation latch fed by process termination signals.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use tracing::debug;

/// First-signal-wins cell shared by the supervisor and every pump.
///
/// The empty state is 0, which is not a valid signal number. The latch
/// is an explicit token handed to each component at construction, not a
/// process-wide global: several supervisors can coexist, and tests can
/// cancel by calling [`SignalLatch::set`] directly instead of delivering
/// a real signal.
#[derive(Debug, Clone, Default)]
pub struct SignalLatch {
    signum: Arc<AtomicI32>,
}

impl SignalLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `signum` unless another signal already latched.
    pub fn set(&self, signum: i32) {
        let _ = self
            .signum
            .compare_exchange(0, signum, Ordering::SeqCst, Ordering::SeqCst);
    }

    pub fn get(&self) -> Option<i32> {
        match self.signum.load(Ordering::SeqCst) {
            0 => None,
            signum => Some(signum),
        }
    }

    pub fn is_set(&self) -> bool {
        self.signum.load(Ordering::SeqCst) != 0
    }
}

/// Install SIGINT/SIGTERM listeners that feed `latch`.
///
/// The listener tasks live for the rest of the process; repeated
/// signals keep the first latched value.
#[cfg(unix)]
pub fn install(latch: &SignalLatch) -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    for kind in [SignalKind::interrupt(), SignalKind::terminate()] {
        let mut stream = signal(kind)?;
        let latch = latch.clone();
        tokio::spawn(async move {
            while stream.recv().await.is_some() {
                debug!(signum = kind.as_raw_value(), "termination signal received");
                latch.set(kind.as_raw_value());
            }
        });
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn install(latch: &SignalLatch) -> std::io::Result<()> {
    let latch = latch.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            latch.set(2);
        }
    });
    Ok(())
}
