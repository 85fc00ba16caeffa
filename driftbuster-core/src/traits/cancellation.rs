//! Cooperative cancellation, threaded through scans.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply-cloned cancellation handle. Workers check it between files and
/// between plugin invocations; the core never polls a wall clock itself —
/// timeouts are the caller's responsibility, expressed as a call to
/// `cancel()` from a deadline timer.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the non-cancelled state. Used when a scanner instance is
    /// reused across multiple `scan()` calls.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Expose the underlying atomic for code that needs to share it with a
    /// parallel walker (e.g. `ignore::WalkParallel`'s per-thread visitor).
    pub fn as_atomic(&self) -> &AtomicBool {
        &self.cancelled
    }
}
