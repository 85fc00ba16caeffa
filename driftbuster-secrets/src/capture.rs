//! Capture manifest: the `<capture-id>-snapshot.json` /
//! `<capture-id>-manifest.json` pair written after a
//! run-profile capture for offline review. Writes follow the same
//! fd-lock + temp-file-then-rename discipline as
//! `driftbuster-hunt`'s `JsonApprovalStore` and `driftbuster-orchestrator`'s
//! `PriorRunStore`.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::SecretsError;
use crate::scanner::Finding;

pub const MANIFEST_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CaptureDurations {
    pub detect_ms: u64,
    pub hunt_ms: u64,
    pub total_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionStats {
    pub placeholder: String,
    pub token_count: usize,
    pub total_replacements: usize,
}

/// One file copied into the capture, with its findings and paths
/// relative to the capture root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub relative_path: String,
    pub findings: Vec<Finding>,
    pub bytes_scanned: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSnapshot {
    pub capture_id: String,
    pub entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureManifest {
    pub schema_version: String,
    pub capture_id: String,
    pub environment: String,
    pub operator: String,
    pub host: String,
    pub reason: String,
    /// UTC timestamp, seconds since epoch.
    pub captured_at: i64,
    pub durations: CaptureDurations,
    pub redaction_stats: RedactionStats,
    pub profile_totals: BTreeMap<String, usize>,
}

/// Caller-supplied fields assembled into a `CaptureManifest`; the three
/// marked required abort the capture when empty.
pub struct CaptureRequest {
    pub capture_id: String,
    pub environment: String,
    pub operator: String,
    pub host: String,
    pub reason: String,
    pub captured_at: i64,
    pub durations: CaptureDurations,
    pub redaction_stats: RedactionStats,
    pub profile_totals: BTreeMap<String, usize>,
    pub entries: Vec<SnapshotEntry>,
}

/// Validate required fields and assemble the manifest and snapshot
/// records, but do not write them — validation is independent of where
/// the caller persists the result.
pub fn build_capture(request: CaptureRequest) -> Result<(CaptureManifest, CaptureSnapshot), SecretsError> {
    require_non_empty("environment", &request.environment)?;
    require_non_empty("operator", &request.operator)?;
    require_non_empty("reason", &request.reason)?;

    let manifest = CaptureManifest {
        schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
        capture_id: request.capture_id.clone(),
        environment: request.environment,
        operator: request.operator,
        host: request.host,
        reason: request.reason,
        captured_at: request.captured_at,
        durations: request.durations,
        redaction_stats: request.redaction_stats,
        profile_totals: request.profile_totals,
    };
    let snapshot = CaptureSnapshot {
        capture_id: request.capture_id,
        entries: request.entries,
    };
    Ok((manifest, snapshot))
}

fn require_non_empty(field: &str, value: &str) -> Result<(), SecretsError> {
    if value.trim().is_empty() {
        return Err(SecretsError::CaptureMissingField { field: field.to_string() });
    }
    Ok(())
}

/// Write `<capture_id>-manifest.json` and `<capture_id>-snapshot.json`
/// into `dir`, atomically, guarded by an exclusive lock per file.
pub fn write_capture(dir: &Path, manifest: &CaptureManifest, snapshot: &CaptureSnapshot) -> Result<(), SecretsError> {
    std::fs::create_dir_all(dir).map_err(|e| SecretsError::CaptureWriteFailed { detail: e.to_string() })?;

    write_json_atomic(&dir.join(format!("{}-manifest.json", manifest.capture_id)), manifest)?;
    write_json_atomic(&dir.join(format!("{}-snapshot.json", snapshot.capture_id)), snapshot)?;
    Ok(())
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), SecretsError> {
    let lock_path = path.with_extension("lock");
    let lock_file = File::create(&lock_path).map_err(|e| SecretsError::CaptureWriteFailed { detail: e.to_string() })?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock.write().map_err(|e| SecretsError::CaptureWriteFailed { detail: e.to_string() })?;

    let json = serde_json::to_vec_pretty(value).map_err(|e| SecretsError::CaptureWriteFailed { detail: e.to_string() })?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json).map_err(|e| SecretsError::CaptureWriteFailed { detail: e.to_string() })?;
    std::fs::rename(&tmp_path, path).map_err(|e| SecretsError::CaptureWriteFailed { detail: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CaptureRequest {
        CaptureRequest {
            capture_id: "cap-20260801".to_string(),
            environment: "staging".to_string(),
            operator: "op1".to_string(),
            host: "host-a".to_string(),
            reason: "incident-1234".to_string(),
            captured_at: 100,
            durations: CaptureDurations {
                detect_ms: 10,
                hunt_ms: 5,
                total_ms: 20,
            },
            redaction_stats: RedactionStats {
                placeholder: "{{ token_name }}".to_string(),
                token_count: 2,
                total_replacements: 4,
            },
            profile_totals: BTreeMap::from([("web-tier".to_string(), 3)]),
            entries: vec![SnapshotEntry {
                relative_path: "app/appsettings.json".to_string(),
                findings: Vec::new(),
                bytes_scanned: 128,
            }],
        }
    }

    #[test]
    fn builds_manifest_with_schema_version() {
        let (manifest, snapshot) = build_capture(request()).unwrap();
        assert_eq!(manifest.schema_version, "1.0");
        assert_eq!(manifest.capture_id, "cap-20260801");
        assert_eq!(snapshot.entries.len(), 1);
    }

    #[test]
    fn missing_environment_aborts() {
        let mut req = request();
        req.environment = String::new();
        let err = build_capture(req).unwrap_err();
        assert!(matches!(err, SecretsError::CaptureMissingField { field } if field == "environment"));
    }

    #[test]
    fn missing_operator_aborts() {
        let mut req = request();
        req.operator = "   ".to_string();
        let err = build_capture(req).unwrap_err();
        assert!(matches!(err, SecretsError::CaptureMissingField { field } if field == "operator"));
    }

    #[test]
    fn write_then_read_round_trips_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, snapshot) = build_capture(request()).unwrap();
        write_capture(dir.path(), &manifest, &snapshot).unwrap();

        let manifest_path = dir.path().join("cap-20260801-manifest.json");
        let snapshot_path = dir.path().join("cap-20260801-snapshot.json");
        assert!(manifest_path.exists());
        assert!(snapshot_path.exists());

        let loaded: CaptureManifest = serde_json::from_slice(&std::fs::read(manifest_path).unwrap()).unwrap();
        assert_eq!(loaded.operator, "op1");
    }
}
