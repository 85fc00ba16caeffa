//! Shared traits used across DriftBuster crates.

pub mod cancellation;
pub mod plugin;
pub mod progress;

pub use cancellation::CancellationToken;
pub use plugin::{Plugin, PluginError};
pub use progress::ProgressSink;
