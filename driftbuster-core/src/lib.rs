//! # driftbuster-core
//!
//! Foundation crate for the DriftBuster detection and diff engine.
//! Defines the shared types, traits, errors, config, constants, and tracing
//! setup that every other crate in the workspace depends on.

#![allow(clippy::module_inception)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing_init;
pub mod traits;
pub mod types;

pub use config::{CacheOptions, DiffOptions, HuntOptions, ScanOptions};
pub use errors::error_code::DriftBusterErrorCode;
pub use errors::ConfigError;
pub use traits::cancellation::CancellationToken;
pub use traits::plugin::{Plugin, PluginError};
pub use traits::progress::ProgressSink;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::detection::DetectionMatch;
