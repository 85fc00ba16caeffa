//! Hunt Engine and token approval data model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A rule that discovers a dynamic value in configuration content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HuntRuleSpec {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// A planned token substitution attached to a `HuntHit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTransform {
    pub value: String,
    pub placeholder: String,
}

/// One rule match within one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntHit {
    pub rule_ref: String,
    pub path: PathBuf,
    pub line_number: usize,
    pub excerpt: String,
    pub relative_path: String,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub plan_transform: Option<PlanTransform>,
}

/// Sensitivity tier recorded alongside an approved token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Low,
    Medium,
    High,
}

/// An out-of-band record confirming a discovered token value is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenApproval {
    pub token_name: String,
    pub source_rule: String,
    pub value_hash: String,
    /// UTC timestamp, seconds since epoch.
    pub last_confirmed: i64,
    pub approved_by: String,
    pub sensitivity: Sensitivity,
}
