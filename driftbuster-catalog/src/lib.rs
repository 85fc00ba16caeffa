//! # driftbuster-catalog
//!
//! The authoritative description of known formats (identity, priority,
//! extensions) plus the ordered registry of format-detector plugins that
//! implement them.

pub mod catalog;
pub mod errors;
pub mod registry;

pub use catalog::Catalog;
pub use driftbuster_core::types::catalog::{CatalogEntry, PluginSummary};
pub use errors::CatalogError;
pub use registry::PluginRegistry;
