//! Catalog and registry errors.

use driftbuster_core::errors::error_code::{self, DriftBusterErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate format_id in catalog: {format_id}")]
    DuplicateFormatId { format_id: String },

    #[error("duplicate plugin name in registry: {name}")]
    DuplicateName { name: String },

    #[error("failed to parse embedded catalog: {message}")]
    MalformedCatalog { message: String },
}

impl DriftBusterErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateFormatId { .. } | Self::DuplicateName { .. } => {
                error_code::DUPLICATE_NAME
            }
            Self::MalformedCatalog { .. } => error_code::VALIDATION_ERROR,
        }
    }
}
