//! Engine-wide constants.

/// Default number of bytes sampled from a file when no override is given.
pub const DEFAULT_SAMPLE_SIZE: usize = 131_072;

/// Hard clamp on sample size; requests above this are truncated to it.
pub const MAX_SAMPLE_SIZE: usize = 524_288;

/// Hard floor on sample size; requests below this (including zero) are
/// raised to it.
pub const MIN_SAMPLE_SIZE: usize = 512;

/// Analysis window for expensive structural heuristics (e.g. JSON nesting
/// scans), independent of how many bytes were sampled from disk.
pub const STRUCTURAL_ANALYSIS_WINDOW: usize = 200 * 1024;

/// Maximum confidence a plugin may report; 1.0 is reserved for a caller
/// confirming a match out-of-band (e.g. via a profile expectation).
pub const MAX_CONFIDENCE: f32 = 0.95;

/// Confidence a plugin starts from before adding independent signals.
pub const BASE_CONFIDENCE: f32 = 0.5;

/// Number of plugin faults within one scan before it is marked degraded.
pub const PLUGIN_FAULT_THRESHOLD: u32 = 3;

/// Current schema version stamped into every `DetectionMatch.metadata`.
pub const CATALOG_SCHEMA_VERSION: &str = "1.0";

/// Default parallelism cap for the multi-server orchestrator.
pub const DEFAULT_MAX_HOST_WORKERS: usize = 8;

/// Default diff cache byte budget (512 MiB).
pub const DEFAULT_CACHE_BYTE_BUDGET: u64 = 512 * 1024 * 1024;

/// Default diff cache time-based eviction horizon, in seconds (30 days).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Default placeholder template for a hunt-discovered token.
pub const DEFAULT_PLACEHOLDER_TEMPLATE: &str = "{{ token_name }}";

/// Fallback placeholder emitted when a rule expects a token but no
/// placeholder survives canonicalisation.
pub fn unresolved_token_placeholder(token_name: &str) -> String {
    format!("[[TOKEN:{token_name}]]")
}
