//! Configuration-time errors — fatal at the API boundary, never swallowed.

use super::error_code::{self, DriftBusterErrorCode};

/// Errors raised while validating or constructing configuration at the
/// API boundary.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid sample size: {requested} (minimum {minimum}, maximum {maximum})")]
    InvalidSampleSize {
        requested: i64,
        minimum: usize,
        maximum: usize,
    },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("malformed glob pattern: {pattern}")]
    MalformedGlob { pattern: String },

    #[error("unknown key(s) in configuration: {keys}")]
    UnknownKeys { keys: String },

    #[error("validation failed: {message}")]
    ValidationError { message: String },
}

impl DriftBusterErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSampleSize { .. } => error_code::INVALID_SAMPLE_SIZE,
            Self::DuplicateName { .. } => error_code::DUPLICATE_NAME,
            Self::MalformedGlob { .. } => error_code::MALFORMED_GLOB,
            Self::UnknownKeys { .. } => error_code::VALIDATION_ERROR,
            Self::ValidationError { .. } => error_code::VALIDATION_ERROR,
        }
    }
}
