//! `DetectionMatch` — one plugin's positive answer about a file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{CATALOG_SCHEMA_VERSION, MAX_CONFIDENCE};

/// One plugin's positive answer, with confidence and metadata.
///
/// `metadata` is a `BTreeMap` (not `HashMap`) so serialization is
/// key-order-deterministic, satisfying the §8 round-trip law without a
/// separate sort pass at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionMatch {
    pub path: PathBuf,
    pub format_id: Option<String>,
    pub variant: Option<String>,
    pub confidence: f32,
    pub reasons: Vec<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl DetectionMatch {
    /// Build the `unknown-text-or-binary` fallback match emitted when no
    /// plugin claims a file.
    pub fn unknown(path: PathBuf, is_binary: bool) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "catalog_version".to_string(),
            serde_json::Value::String(CATALOG_SCHEMA_VERSION.to_string()),
        );
        Self {
            path,
            format_id: Some(if is_binary {
                "binary-dat".to_string()
            } else {
                "unknown-text-or-binary".to_string()
            }),
            variant: None,
            confidence: 0.0,
            reasons: vec!["no plugin matched".to_string()],
            metadata,
        }
    }

    /// Clamp a proposed confidence into the documented `[0, 0.95]` range.
    pub fn clamp_confidence(value: f32) -> f32 {
        value.clamp(0.0, MAX_CONFIDENCE)
    }

    pub fn is_positive(&self) -> bool {
        self.format_id
            .as_deref()
            .is_some_and(|f| f != "unknown-text-or-binary" && f != "binary-dat")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_match_has_zero_confidence() {
        let m = DetectionMatch::unknown(PathBuf::from("a.bin"), true);
        assert_eq!(m.confidence, 0.0);
        assert_eq!(m.format_id.as_deref(), Some("binary-dat"));
        assert!(!m.is_positive());
    }

    #[test]
    fn clamp_confidence_never_exceeds_max() {
        assert_eq!(DetectionMatch::clamp_confidence(5.0), MAX_CONFIDENCE);
        assert_eq!(DetectionMatch::clamp_confidence(-1.0), 0.0);
    }
}
