//! Per-entry I/O failures — reported via callback, never abort a scan.

use std::path::PathBuf;

use super::error_code::{self, DriftBusterErrorCode};

/// A single file- or host-scoped I/O failure, handed to the caller's error
/// callback rather than aborting the scan.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{detail}")]
pub struct IoFailure {
    pub kind: IoFailureKind,
    pub host_id: Option<String>,
    pub path: Option<PathBuf>,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoFailureKind {
    PermissionDenied,
    Offline,
    DecodeFailed,
    Other,
}

impl DriftBusterErrorCode for IoFailure {
    fn error_code(&self) -> &'static str {
        match self.kind {
            IoFailureKind::PermissionDenied => error_code::PERMISSION_DENIED,
            IoFailureKind::Offline => error_code::OFFLINE,
            IoFailureKind::DecodeFailed => error_code::DECODE_FAILED,
            IoFailureKind::Other => error_code::IO_ERROR,
        }
    }
}

impl IoFailure {
    pub fn new(kind: IoFailureKind, path: Option<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            host_id: None,
            path,
            detail: detail.into(),
        }
    }

    pub fn with_host(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = Some(host_id.into());
        self
    }
}
