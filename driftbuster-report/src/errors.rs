//! Report Adapters errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("HTML template rendering failed: {detail}")]
    TemplateFailed { detail: String },
}

impl DriftBusterErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TemplateFailed { .. } => error_code::VALIDATION_ERROR,
        }
    }
}
