//! Multi-Server Orchestrator data model.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A caller-supplied description of one host's roots and preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerScanPlan {
    pub host_id: String,
    pub label: String,
    pub roots: Vec<PathBuf>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub baseline_pref: Option<bool>,
    #[serde(default)]
    pub throttle: Option<u32>,
}

/// Per-host state transition event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub host_id: String,
    pub state: ScanState,
    /// UTC timestamp, seconds since epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Skipped,
    PermissionDenied,
    Offline,
}

/// Per-host presence of one logical config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Found,
    Missing,
    Error,
}

/// Aggregated per-config view in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub config_id: String,
    pub per_host_presence: BTreeMap<String, Presence>,
    pub drift_count: usize,
    pub severity: Severity,
    pub format_id: String,
    /// UTC timestamp, seconds since epoch, of the most recent contributing
    /// file mtime.
    pub last_updated: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// Overall result of one `run_server_scans` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub catalog: Vec<CatalogRow>,
    pub drilldowns: BTreeMap<String, Drilldown>,
    pub per_host_status: BTreeMap<String, ScanState>,
}

/// Per-config detail payload assembled alongside a `CatalogRow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drilldown {
    pub config_id: String,
    pub diff_snippets: BTreeMap<String, String>,
    pub token_approval_status: BTreeMap<String, bool>,
    pub detector_name: String,
    pub detector_version: String,
    /// UTC timestamp, seconds since epoch.
    pub scanned_at: i64,
    pub secret_exposure: bool,
}
