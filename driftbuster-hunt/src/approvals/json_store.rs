//! `JsonApprovalStore` — a single `approvals.json`, written via
//! temp-file-then-rename for atomicity, guarded by an `fd-lock` exclusive
//! lock during writes.

use std::fs::File;
use std::path::PathBuf;

use driftbuster_core::types::hunt::TokenApproval;

use super::ApprovalStore;
use crate::errors::HuntError;

pub struct JsonApprovalStore {
    path: PathBuf,
}

impl JsonApprovalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_raw(&self) -> Result<Vec<TokenApproval>, HuntError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(&self.path).map_err(|e| HuntError::ApprovalStoreReadFailed {
            detail: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| HuntError::ApprovalStoreReadFailed {
            detail: e.to_string(),
        })
    }

    fn write_raw(&self, approvals: &[TokenApproval]) -> Result<(), HuntError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HuntError::ApprovalStoreWriteFailed {
                detail: e.to_string(),
            })?;
        }
        let lock_path = self.path.with_extension("lock");
        let lock_file = File::create(&lock_path).map_err(|e| HuntError::ApprovalStoreWriteFailed {
            detail: e.to_string(),
        })?;
        let mut lock = fd_lock::RwLock::new(lock_file);
        let _guard = lock.write().map_err(|e| HuntError::ApprovalStoreWriteFailed {
            detail: e.to_string(),
        })?;

        let json = serde_json::to_vec_pretty(approvals).map_err(|e| HuntError::ApprovalStoreWriteFailed {
            detail: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(|e| HuntError::ApprovalStoreWriteFailed {
            detail: e.to_string(),
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| HuntError::ApprovalStoreWriteFailed {
            detail: e.to_string(),
        })
    }
}

impl ApprovalStore for JsonApprovalStore {
    fn load_all(&self) -> Result<Vec<TokenApproval>, HuntError> {
        self.read_raw()
    }

    fn approve(&self, approval: TokenApproval) -> Result<(), HuntError> {
        let mut approvals = self.read_raw()?;
        approvals.retain(|a| a.token_name != approval.token_name);
        approvals.push(approval);
        self.write_raw(&approvals)
    }

    fn revoke(&self, token_name: &str) -> Result<(), HuntError> {
        let mut approvals = self.read_raw()?;
        approvals.retain(|a| a.token_name != token_name);
        self.write_raw(&approvals)
    }
}
