//! Diff & Redaction Pipeline errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("invalid mask pattern '{pattern}': {detail}")]
    InvalidMaskPattern { pattern: String, detail: String },
}

impl DriftBusterErrorCode for DiffError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMaskPattern { .. } => error_code::VALIDATION_ERROR,
        }
    }
}
