//! Diff Cache errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache read failed: {detail}")]
    ReadFailed { detail: String },

    #[error("cache write failed: {detail}")]
    WriteFailed { detail: String },
}

impl DriftBusterErrorCode for CacheError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ReadFailed { .. } => error_code::CACHE_READ_FAILED,
            Self::WriteFailed { .. } => error_code::CACHE_WRITE_FAILED,
        }
    }
}
