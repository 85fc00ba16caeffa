//! The ten built-in format plugins.

pub mod conf;
pub mod dockerfile;
pub mod hcl;
pub mod ini;
pub mod json;
pub mod registry_live;
pub mod text;
pub mod toml_plugin;
pub mod xml;
pub mod yaml;

use std::collections::BTreeMap;
use std::path::Path;

use driftbuster_core::constants::{BASE_CONFIDENCE, CATALOG_SCHEMA_VERSION};
use driftbuster_core::types::detection::DetectionMatch;
use serde_json::Value;

use crate::metadata;

/// Shared builder for a positive `DetectionMatch`: fills the mandatory
/// `catalog_*` keys and runs the result through the central
/// metadata normaliser so individual plugins only ever
/// think about their own format-specific keys.
pub(crate) struct MatchBuilder {
    format_id: &'static str,
    variant: Option<String>,
    confidence: f32,
    reasons: Vec<String>,
    metadata: BTreeMap<String, Value>,
}

impl MatchBuilder {
    pub(crate) fn new(format_id: &'static str) -> Self {
        Self {
            format_id,
            variant: None,
            confidence: BASE_CONFIDENCE,
            reasons: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub(crate) fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub(crate) fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    pub(crate) fn boost(mut self, amount: f32) -> Self {
        self.confidence = DetectionMatch::clamp_confidence(self.confidence + amount);
        self
    }

    pub(crate) fn meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn build(self, path: &Path) -> DetectionMatch {
        let mut metadata = self.metadata;
        metadata.insert(
            "catalog_version".to_string(),
            Value::String(CATALOG_SCHEMA_VERSION.to_string()),
        );
        metadata.insert(
            "catalog_format".to_string(),
            Value::String(self.format_id.to_string()),
        );
        if let Some(variant) = &self.variant {
            metadata.insert("catalog_variant".to_string(), Value::String(variant.clone()));
        }

        DetectionMatch {
            path: path.to_path_buf(),
            format_id: Some(self.format_id.to_string()),
            variant: self.variant,
            confidence: DetectionMatch::clamp_confidence(self.confidence),
            reasons: self.reasons,
            metadata: metadata::normalise(metadata),
        }
    }
}

/// Extension of `path`, lowercased, without the leading dot.
pub(crate) fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// File name only (no directory components), for filename-regex matching.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
