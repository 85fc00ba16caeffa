//! Detector orchestrator errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("invalid sample size: {0}")]
    InvalidSampleSize(#[from] driftbuster_core::errors::ConfigError),

    #[error("failed to walk root {root}: {detail}")]
    WalkFailed { root: String, detail: String },
}

impl DriftBusterErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSampleSize(e) => e.error_code(),
            Self::WalkFailed { .. } => error_code::IO_ERROR,
        }
    }
}
