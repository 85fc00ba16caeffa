//! Multi-Server Orchestrator errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("no scan plans supplied")]
    NoPlans,

    #[error("prior-run store read failed: {detail}")]
    PriorRunReadFailed { detail: String },

    #[error("prior-run store write failed: {detail}")]
    PriorRunWriteFailed { detail: String },

    #[error("diff failed: {detail}")]
    DiffFailed { detail: String },
}

impl DriftBusterErrorCode for OrchestratorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoPlans => error_code::VALIDATION_ERROR,
            Self::PriorRunReadFailed { .. } => error_code::CACHE_READ_FAILED,
            Self::PriorRunWriteFailed { .. } => error_code::CACHE_WRITE_FAILED,
            Self::DiffFailed { .. } => error_code::VALIDATION_ERROR,
        }
    }
}
