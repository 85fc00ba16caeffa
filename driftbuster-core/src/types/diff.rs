//! Diff & Redaction Pipeline, and Diff Cache, data model.

use serde::{Deserialize, Serialize};

/// One redacted span reported alongside a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redaction {
    pub token_name: String,
    pub placeholder: String,
    pub expected: bool,
}

/// Line-count statistics for a unified diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

/// The output of `build_unified_diff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub canonical_before: String,
    pub canonical_after: String,
    pub diff_text: String,
    pub stats: DiffStats,
    pub redactions: Vec<Redaction>,
    pub masked_flag: bool,
    /// Set when `canonicalise_xml`/`canonicalise_json` hit a parse error on
    /// either side and fell back to `canonicalise_text`.
    pub canonicalisation_fallback: bool,
}

/// Content-addressed identifier for a cached `DiffResult`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiffCacheKey {
    pub host_id: String,
    pub config_id: String,
    pub root_sig: String,
    pub input_hash_before: String,
    pub input_hash_after: String,
    pub redactor_fingerprint: String,
}

impl DiffCacheKey {
    /// Stable hash of the key components, used to derive the on-disk path.
    pub fn key_hash(&self) -> String {
        use std::hash::Hasher;
        let mut hasher = rustc_hash::FxHasher::default();
        hasher.write(self.host_id.as_bytes());
        hasher.write(self.config_id.as_bytes());
        hasher.write(self.root_sig.as_bytes());
        hasher.write(self.input_hash_before.as_bytes());
        hasher.write(self.input_hash_after.as_bytes());
        hasher.write(self.redactor_fingerprint.as_bytes());
        format!("{:016x}", hasher.finish())
    }

    /// Stable hash of `config_id` alone, used as the second path segment
    /// in the cache directory layout.
    pub fn config_id_hash(&self) -> String {
        use std::hash::Hasher;
        let mut hasher = rustc_hash::FxHasher::default();
        hasher.write(self.config_id.as_bytes());
        format!("{:016x}", hasher.finish())
    }
}
