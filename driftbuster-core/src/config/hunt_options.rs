//! Hunt Engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PLACEHOLDER_TEMPLATE;

/// Configuration for one `hunt_path` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HuntOptions {
    pub glob: Option<String>,
    pub exclude_patterns: Vec<String>,
    pub return_structured: bool,
    pub placeholder_template: String,
}

impl Default for HuntOptions {
    fn default() -> Self {
        Self {
            glob: None,
            exclude_patterns: Vec::new(),
            return_structured: false,
            placeholder_template: DEFAULT_PLACEHOLDER_TEMPLATE.to_string(),
        }
    }
}
