//! Per-host scan: walk one host's roots, detect every file, and read its
//! full decoded content for downstream diffing.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use driftbuster_catalog::PluginRegistry;
use driftbuster_core::traits::cancellation::CancellationToken;
use driftbuster_core::types::server::ServerScanPlan;
use driftbuster_core::ScanOptions;
use driftbuster_detect::sampling::codec::decode_sample;
use driftbuster_detect::DetectorOrchestrator;

use crate::config_id::normalise_config_id;
use crate::errors::OrchestratorError;

/// One detected, decoded file contributing to a host's view of the fleet.
#[derive(Debug, Clone)]
pub struct HostFile {
    pub config_id: String,
    pub format_id: String,
    pub content: Option<String>,
    /// UTC timestamp, seconds since epoch, of the file's mtime.
    pub mtime: i64,
}

/// What a scan attempt against one host's roots concluded.
pub enum HostOutcome {
    Scanned(Vec<HostFile>),
    PermissionDenied,
    Offline,
    Failed(String),
    Skipped,
}

/// Walk every root in `plan`, detect each file, and read its full
/// decoded content (bounded scanning is for format detection only;
/// diffing needs the whole file, so no bound is imposed here). Per-file
/// read errors are logged and the file is skipped, never aborting the
/// host.
pub fn scan_host(
    plan: &ServerScanPlan,
    registry: &PluginRegistry,
    scan_options: &ScanOptions,
    cancellation: &CancellationToken,
) -> HostOutcome {
    if cancellation.is_cancelled() {
        return HostOutcome::Skipped;
    }

    let mut reachable_roots = 0usize;
    let mut permission_denied_roots = 0usize;
    let mut files = Vec::new();

    for root in &plan.roots {
        if !root.exists() {
            continue;
        }
        reachable_roots += 1;

        let mut orchestrator = DetectorOrchestrator::new(registry);
        let mut had_permission_error = false;
        let matches = orchestrator.scan_path(root, scan_options, cancellation, |failure| {
            if matches!(
                failure.kind,
                driftbuster_core::errors::IoFailureKind::PermissionDenied
            ) {
                had_permission_error = true;
            }
            tracing::warn!(host_id = %plan.host_id, path = ?failure.path, detail = %failure.detail, "per-file scan error");
        });

        let matches = match matches {
            Ok(matches) => matches,
            Err(e) => {
                return HostOutcome::Failed(e.to_string());
            }
        };
        if had_permission_error {
            permission_denied_roots += 1;
        }

        for detection in matches {
            if cancellation.is_cancelled() {
                break;
            }
            let config_id = normalise_config_id(&detection, root);
            let format_id = detection
                .format_id
                .clone()
                .unwrap_or_else(|| "unknown-text-or-binary".to_string());
            let content = read_decoded(&detection.path);
            let mtime = mtime_of(&detection.path);
            files.push(HostFile {
                config_id,
                format_id,
                content,
                mtime,
            });
        }
    }

    if reachable_roots == 0 {
        if plan.roots.is_empty() {
            return HostOutcome::Scanned(files);
        }
        return if plan.scope.as_deref() == Some("offline") {
            HostOutcome::Offline
        } else {
            HostOutcome::Failed("none of this host's roots are reachable".to_string())
        };
    }
    if permission_denied_roots == reachable_roots {
        return HostOutcome::PermissionDenied;
    }

    HostOutcome::Scanned(files)
}

fn read_decoded(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    decode_sample(&bytes).text
}

fn mtime_of(path: &Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Compute a stable signature for a plan's root set, used as the
/// `root_sig` component of a `DiffCacheKey` so cache entries invalidate
/// when the roots that produced a config change.
pub fn root_signature(roots: &[PathBuf]) -> String {
    let mut sorted: Vec<String> = roots.iter().map(|p| p.to_string_lossy().replace('\\', "/")).collect();
    sorted.sort();
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(sorted.join("\u{1}").as_bytes()))
}

pub(crate) fn validate_plans(plans: &[ServerScanPlan]) -> Result<(), OrchestratorError> {
    if plans.is_empty() {
        return Err(OrchestratorError::NoPlans);
    }
    Ok(())
}
