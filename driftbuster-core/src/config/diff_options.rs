//! Diff & Redaction Pipeline configuration.

use serde::{Deserialize, Serialize};

/// A named mask rule: a token name plus the regex that finds its value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskToken {
    pub token_name: String,
    pub pattern: String,
}

/// Labels attached to the two sides of a diff (e.g. host ids or file
/// paths), used purely for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffLabels {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Xml,
    Json,
}

/// Configuration for one `build_unified_diff` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffOptions {
    pub content_type: ContentType,
    pub labels: DiffLabels,
    pub mask_tokens: Vec<MaskToken>,
    pub context_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            content_type: ContentType::Text,
            labels: DiffLabels::default(),
            mask_tokens: Vec::new(),
            context_lines: 3,
        }
    }
}
