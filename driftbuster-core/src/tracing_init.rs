//! Opt-in `tracing-subscriber` initializer for binary consumers.
//!
//! Library crates never call this themselves — only a CLI or service entry
//! point should install a global subscriber. Exposed here so every
//! consumer shares the same `EnvFilter` conventions instead of
//! reinventing them.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber reading its filter from
/// `DRIFTBUSTER_LOG` (falling back to `info`). Safe to call at most once;
/// subsequent calls are no-ops.
pub fn init_from_env() {
    let filter = EnvFilter::try_from_env("DRIFTBUSTER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
