//! Secret Scanner errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("failed to compile secret rule '{rule}': {detail}")]
    RuleCompileFailed { rule: String, detail: String },

    #[error("secret rule '{rule}' declares a token_name; secret rules must not extract tokens")]
    RuleHasTokenName { rule: String },

    #[error("invalid ignore pattern '{pattern}': {detail}")]
    InvalidIgnorePattern { pattern: String, detail: String },

    #[error("failed to copy '{src_path}' to '{destination}': {detail}")]
    CopyFailed {
        src_path: String,
        destination: String,
        detail: String,
    },

    #[error("capture manifest missing required field '{field}'")]
    CaptureMissingField { field: String },

    #[error("capture write failed: {detail}")]
    CaptureWriteFailed { detail: String },
}

impl DriftBusterErrorCode for SecretsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RuleCompileFailed { .. } => error_code::VALIDATION_ERROR,
            Self::RuleHasTokenName { .. } => error_code::VALIDATION_ERROR,
            Self::InvalidIgnorePattern { .. } => error_code::VALIDATION_ERROR,
            Self::CopyFailed { .. } => error_code::IO_ERROR,
            Self::CaptureMissingField { .. } => error_code::VALIDATION_ERROR,
            Self::CaptureWriteFailed { .. } => error_code::CACHE_WRITE_FAILED,
        }
    }
}
