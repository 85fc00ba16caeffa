//! Catalog entry and plugin summary record types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::server::Severity;

/// One known format's identity, priority, and filename cues.
///
/// Lower `priority` runs first; the first positive match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub format_id: String,
    pub variant: Option<String>,
    pub priority: i32,
    #[serde(default)]
    pub extensions: BTreeSet<String>,
    #[serde(default)]
    pub filename_regexes: BTreeSet<String>,
    #[serde(default)]
    pub usage_share: f64,
    /// Human-readable summary of the format family.
    #[serde(default)]
    pub description: Option<String>,
    /// This format family's baseline severity when it drifts, used by the
    /// multi-server orchestrator's `CatalogRow.severity` as the max of
    /// catalog severities of the formats involved.
    #[serde(default)]
    pub default_severity: Severity,
}

/// Schema version stamped into every emitted `DetectionMatch.metadata`.
pub const CATALOG_SCHEMA_VERSION: &str = "1.0";

/// A snapshot row returned by `PluginRegistry::summary()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSummary {
    pub index: usize,
    pub name: String,
    pub module_id: String,
    pub priority: i32,
    pub version: String,
}
