//! Hunt Engine and approval-store errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum HuntError {
    #[error("malformed glob pattern: {pattern}")]
    MalformedGlob { pattern: String },

    #[error("failed to compile rule '{rule}': {detail}")]
    RuleCompileFailed { rule: String, detail: String },

    #[error("approval store read failed: {detail}")]
    ApprovalStoreReadFailed { detail: String },

    #[error("approval store write failed: {detail}")]
    ApprovalStoreWriteFailed { detail: String },
}

impl DriftBusterErrorCode for HuntError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedGlob { .. } => error_code::MALFORMED_GLOB,
            Self::RuleCompileFailed { .. } => error_code::VALIDATION_ERROR,
            Self::ApprovalStoreReadFailed { .. } => error_code::CACHE_READ_FAILED,
            Self::ApprovalStoreWriteFailed { .. } => error_code::CACHE_WRITE_FAILED,
        }
    }
}
