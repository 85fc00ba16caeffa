//! Logical config_id normalisation.

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;

/// Prefer a detector-supplied logical identifier
/// (`metadata.logical_config_id`), then a POSIX-relative path rooted at
/// the scan root, then a stable hash of that path when it can't be
/// represented reliably (non-UTF-8 or empty).
pub fn normalise_config_id(detection: &DetectionMatch, root: &Path) -> String {
    if let Some(logical) = detection.metadata.get("logical_config_id").and_then(|v| v.as_str()) {
        return logical.to_string();
    }

    let relative = detection
        .path
        .strip_prefix(root)
        .unwrap_or(&detection.path)
        .to_string_lossy()
        .replace('\\', "/");

    if relative.is_empty() || relative.contains('\u{FFFD}') {
        hash_relative_path(&relative)
    } else {
        relative
    }
}

fn hash_relative_path(relative: &str) -> String {
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(relative.as_bytes()))
}
