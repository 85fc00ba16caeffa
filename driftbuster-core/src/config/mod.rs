//! Explicit, validated configuration structs in place of dynamic typing.
//! Every struct here rejects unknown keys at deserialization time via
//! `#[serde(deny_unknown_fields)]`.

mod cache_options;
mod diff_options;
mod hunt_options;
mod scan_options;

pub use cache_options::CacheOptions;
pub use diff_options::{ContentType, DiffLabels, DiffOptions, MaskToken};
pub use hunt_options::HuntOptions;
pub use scan_options::ScanOptions;

use std::path::PathBuf;

/// Resolve the platform-appropriate cache directory, honouring a
/// caller override before falling back to the platform default.
pub fn cache_dir(override_dir: Option<&PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .map(|d| d.join("driftbuster"))
        .unwrap_or_else(|| PathBuf::from(".driftbuster-cache"))
}
