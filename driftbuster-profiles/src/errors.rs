//! Profile Store errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("duplicate profile name: {name}")]
    DuplicateName { name: String },

    #[error("duplicate config identifier: {identifier}")]
    DuplicateConfigIdentifier { identifier: String },

    #[error("unknown profile: {name}")]
    UnknownProfile { name: String },

    #[error("unknown config: {identifier}")]
    UnknownConfig { identifier: String },

    #[error("validation failed: {message}")]
    ValidationError { message: String },
}

impl DriftBusterErrorCode for ProfileError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateName { .. } => error_code::DUPLICATE_NAME,
            Self::DuplicateConfigIdentifier { .. } => error_code::DUPLICATE_NAME,
            Self::UnknownProfile { .. } => error_code::UNKNOWN_PROFILE,
            Self::UnknownConfig { .. } => error_code::UNKNOWN_CONFIG,
            Self::ValidationError { .. } => error_code::VALIDATION_ERROR,
        }
    }
}
