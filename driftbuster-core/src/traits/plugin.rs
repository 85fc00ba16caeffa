//! The format-plugin contract.

use std::path::Path;

use crate::types::detection::DetectionMatch;

/// A fault raised by a plugin's `detect` call. Plugins are expected never
/// to raise on expected input shapes; this type exists so the
/// orchestrator can still convert an unexpected panic/fault into a decline
/// without losing the reason.
#[derive(Debug, Clone, thiserror::Error)]
#[error("plugin '{plugin}' faulted: {detail}")]
pub struct PluginError {
    pub plugin: String,
    pub detail: String,
}

/// A pure format detector over `(path, sample_bytes, decoded_text)`.
///
/// Implementations must never parse the entire sample with an unbounded
/// grammar, must return `None` when uncertain, and must be safe to call
/// repeatedly and concurrently with other plugins over distinct inputs.
pub trait Plugin: Send + Sync {
    /// Stable, registry-unique plugin name.
    fn name(&self) -> &'static str;

    /// Lower runs first; ties are broken by registration order.
    fn priority(&self) -> i32;

    /// Semantic version of this plugin's detection logic, surfaced in
    /// `PluginRegistry::summary()`.
    fn version(&self) -> &'static str;

    /// Attempt to classify the sampled file. Returns `None` when this
    /// plugin declines.
    fn detect(&self, path: &Path, sample: &[u8], text: Option<&str>) -> Option<DetectionMatch>;
}
