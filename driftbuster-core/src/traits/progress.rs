//! Progress event sink.

use crate::types::server::ScanProgress;

/// Receives `ScanProgress` transitions from the multi-server orchestrator.
/// Implementations own their own buffering/coalescing; emission from the
/// orchestrator side is always non-blocking.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, event: ScanProgress);
}

/// A sink that discards every event, for callers that only want the final
/// `ScanResult`.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_progress(&self, _event: ScanProgress) {}
}
