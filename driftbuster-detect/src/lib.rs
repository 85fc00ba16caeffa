//! # driftbuster-detect
//!
//! The Detector Orchestrator: walks a root, samples bytes, asks each
//! registered plugin in priority order, and emits `DetectionMatch`es
//!. Also hosts the ten built-in format plugins.

pub mod builtins;
pub mod errors;
pub mod metadata;
pub mod orchestrator;
pub mod plugins;
pub mod sampling;
pub mod walker;

pub use builtins::default_registry;
pub use errors::ScanError;
pub use orchestrator::{DetectorOrchestrator, ProfiledDetection};
