//! `PriorRunStore` — a JSON snapshot of each host's last scan state,
//! keyed by `host_id`. Answers "did this host succeed last time",
//! distinct from `driftbuster-cache`'s content-addressed `DiffResult`
//! store. Atomic writes follow the same fd-lock + temp-file-then-rename
//! discipline as `driftbuster-hunt`'s `JsonApprovalStore`.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;

use driftbuster_core::types::server::ScanState;
use serde::{Deserialize, Serialize};

use crate::errors::OrchestratorError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorRunEntry {
    pub state: ScanState,
    /// UTC timestamp, seconds since epoch.
    pub last_attempted: i64,
}

pub struct PriorRunStore {
    path: PathBuf,
}

impl PriorRunStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<BTreeMap<String, PriorRunEntry>, OrchestratorError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let bytes = std::fs::read(&self.path).map_err(|e| OrchestratorError::PriorRunReadFailed { detail: e.to_string() })?;
        serde_json::from_slice(&bytes).map_err(|e| OrchestratorError::PriorRunReadFailed { detail: e.to_string() })
    }

    pub fn save(&self, snapshot: &BTreeMap<String, PriorRunEntry>) -> Result<(), OrchestratorError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| OrchestratorError::PriorRunWriteFailed { detail: e.to_string() })?;
        }
        let lock_path = self.path.with_extension("lock");
        let lock_file = File::create(&lock_path).map_err(|e| OrchestratorError::PriorRunWriteFailed { detail: e.to_string() })?;
        let mut lock = fd_lock::RwLock::new(lock_file);
        let _guard = lock.write().map_err(|e| OrchestratorError::PriorRunWriteFailed { detail: e.to_string() })?;

        let json = serde_json::to_vec_pretty(snapshot).map_err(|e| OrchestratorError::PriorRunWriteFailed { detail: e.to_string() })?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(|e| OrchestratorError::PriorRunWriteFailed { detail: e.to_string() })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| OrchestratorError::PriorRunWriteFailed { detail: e.to_string() })
    }

    /// Hosts whose last recorded state needs a fresh scan for
    /// `run_missing`: reuses prior results for `succeeded` hosts and
    /// only re-scans `failed`/`skipped`/`offline` ones.
    pub fn needs_rescan(&self, host_id: &str, snapshot: &BTreeMap<String, PriorRunEntry>) -> bool {
        match snapshot.get(host_id) {
            Some(entry) => !matches!(entry.state, ScanState::Succeeded),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PriorRunStore::new(dir.path().join("prior_run.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PriorRunStore::new(dir.path().join("prior_run.json"));
        let mut snapshot = BTreeMap::new();
        snapshot.insert(
            "host-a".to_string(),
            PriorRunEntry {
                state: ScanState::Succeeded,
                last_attempted: 100,
            },
        );
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["host-a"].state, ScanState::Succeeded);
    }

    #[test]
    fn needs_rescan_is_true_for_unknown_and_non_succeeded_hosts() {
        let dir = tempfile::tempdir().unwrap();
        let store = PriorRunStore::new(dir.path().join("prior_run.json"));
        let mut snapshot = BTreeMap::new();
        snapshot.insert(
            "host-a".to_string(),
            PriorRunEntry {
                state: ScanState::Succeeded,
                last_attempted: 1,
            },
        );
        snapshot.insert(
            "host-b".to_string(),
            PriorRunEntry {
                state: ScanState::Failed,
                last_attempted: 1,
            },
        );

        assert!(!store.needs_rescan("host-a", &snapshot));
        assert!(store.needs_rescan("host-b", &snapshot));
        assert!(store.needs_rescan("host-c", &snapshot));
    }
}
