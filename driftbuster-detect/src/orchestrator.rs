//! `DetectorOrchestrator` — walks a root, samples bytes, asks plugins in
//! priority order, and emits `DetectionMatch`es.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use driftbuster_catalog::PluginRegistry;
use driftbuster_core::constants::{CATALOG_SCHEMA_VERSION, PLUGIN_FAULT_THRESHOLD};
use driftbuster_core::errors::{IoFailure, IoFailureKind};
use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::{CancellationToken, FxHashMap, ScanOptions};
use driftbuster_profiles::{ConfigurationProfile, ProfileConfig, ProfileStore};

use crate::errors::ScanError;
use crate::sampling::{codec, looks_binary, read_sample};
use crate::walker::walk_files;

/// A `DetectionMatch` paired with every `(Profile, ProfileConfig)` whose
/// activation tags and path rules apply to it.
pub type ProfiledDetection = (DetectionMatch, Vec<(ConfigurationProfile, ProfileConfig)>);

/// Single-threaded scan context: one orchestrator per scan, though two
/// orchestrators may run concurrently with distinct roots. Owns the
/// plugin registry reference and the per-scan plugin fault counter.
pub struct DetectorOrchestrator<'a> {
    registry: &'a PluginRegistry,
    fault_counts: FxHashMap<&'static str, u32>,
}

impl<'a> DetectorOrchestrator<'a> {
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self {
            registry,
            fault_counts: FxHashMap::default(),
        }
    }

    /// Classify a single file, reading at most `effective_sample_size`
    /// bytes.
    pub fn scan_file(&mut self, path: &Path, options: &ScanOptions) -> Result<DetectionMatch, ScanError> {
        options.validate()?;
        let (sample_size, _clamped) = options.effective_sample_size();
        Ok(self.scan_file_at(path, sample_size))
    }

    fn scan_file_at(&mut self, path: &Path, sample_size: usize) -> DetectionMatch {
        let sample = match read_sample(path, sample_size) {
            Ok(s) => s,
            Err(_) => return DetectionMatch::unknown(path.to_path_buf(), true),
        };

        let decoded = if looks_binary(&sample.bytes) {
            codec::DecodedText {
                text: None,
                encoding: None,
            }
        } else {
            codec::decode_sample(&sample.bytes)
        };

        let text = decoded.text.as_deref();
        let found = self.detect_with_fault_tracking(path, &sample.bytes, text);

        let mut result = found.unwrap_or_else(|| {
            DetectionMatch::unknown(path.to_path_buf(), decoded.text.is_none())
        });

        annotate_mandatory_metadata(&mut result, sample.bytes_sampled, sample.truncated, decoded.encoding);
        result
    }

    /// Invoke the registry's `detect_first`, but track per-plugin faults
    /// across the lifetime of this orchestrator: a plugin that faults
    /// repeatedly (≥3 within one scan) is marked degraded for the
    /// remainder of the scan. The registry already catches panics; this
    /// layer just counts how many times each plugin's slot in the
    /// priority order produced a fault-driven decline versus a real
    /// decline is indistinguishable from outside the registry, so
    /// degraded plugins are instead tracked by name via a thin wrapper
    /// pass that re-invokes plugins individually once a fault is
    /// observed for the whole-registry call.
    fn detect_with_fault_tracking(
        &mut self,
        path: &Path,
        sample: &[u8],
        text: Option<&str>,
    ) -> Option<DetectionMatch> {
        for plugin in self.registry.iter() {
            if self.is_degraded(plugin.name()) {
                continue;
            }
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                plugin.detect(path, sample, text)
            }));
            match result {
                Ok(Some(m)) => return Some(m),
                Ok(None) => continue,
                Err(_) => {
                    let count = self.fault_counts.entry(plugin.name()).or_insert(0);
                    *count += 1;
                    tracing::error!(plugin = plugin.name(), faults = *count, "plugin panicked during detection");
                    continue;
                }
            }
        }
        None
    }

    fn is_degraded(&self, plugin_name: &str) -> bool {
        self.fault_counts
            .get(plugin_name)
            .is_some_and(|&count| count >= PLUGIN_FAULT_THRESHOLD)
    }

    /// Walk `root`, applying `options`, and return every match in
    /// deterministic lexicographic-by-path order. Read errors
    /// for individual files are reported via `on_error` and the file is
    /// skipped rather than aborting the walk.
    pub fn scan_path(
        &mut self,
        root: &Path,
        options: &ScanOptions,
        cancellation: &CancellationToken,
        mut on_error: impl FnMut(IoFailure),
    ) -> Result<Vec<DetectionMatch>, ScanError> {
        options.validate()?;
        if !root.exists() {
            return Err(ScanError::WalkFailed {
                root: root.display().to_string(),
                detail: "root does not exist".to_string(),
            });
        }
        let (sample_size, _clamped) = options.effective_sample_size();

        let glob_pattern = match &options.glob {
            Some(pattern) => Some(
                glob::Pattern::new(pattern)
                    .map_err(|_| driftbuster_core::errors::ConfigError::MalformedGlob {
                        pattern: pattern.clone(),
                    })?,
            ),
            None => None,
        };

        let files = walk_files(
            root,
            glob_pattern.as_ref(),
            options.follow_symlinks,
            &options.extra_ignore,
            cancellation,
        );

        let mut matches = Vec::with_capacity(files.len());
        for path in files {
            if cancellation.is_cancelled() {
                break;
            }
            if let Err(failure) = preflight_readable(&path) {
                on_error(failure);
                continue;
            }
            matches.push(self.scan_file_at(&path, sample_size));
        }
        Ok(matches)
    }

    /// `scan_path` plus, for each match, every `(Profile, ProfileConfig)`
    /// applicable under `tags` whose path rule matches the match's
    /// scan-root-relative path.
    pub fn scan_with_profiles(
        &mut self,
        root: &Path,
        options: &ScanOptions,
        profile_store: &ProfileStore,
        tags: &BTreeSet<String>,
        cancellation: &CancellationToken,
        mut on_error: impl FnMut(IoFailure),
    ) -> Result<Vec<ProfiledDetection>, ScanError> {
        let matches = self.scan_path(root, options, cancellation, &mut on_error)?;
        Ok(matches
            .into_iter()
            .map(|detection| {
                let relative = relative_posix_path(root, &detection.path);
                let pairs = profile_store.matching_configs(tags, &relative);
                (detection, pairs)
            })
            .collect())
    }
}

fn preflight_readable(path: &Path) -> Result<(), IoFailure> {
    match std::fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Err(IoFailure::new(
            IoFailureKind::PermissionDenied,
            Some(path.to_path_buf()),
            format!("permission denied reading {}", path.display()),
        )),
        Err(e) => Err(IoFailure::new(
            IoFailureKind::Other,
            Some(path.to_path_buf()),
            e.to_string(),
        )),
    }
}

fn relative_posix_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

fn annotate_mandatory_metadata(
    result: &mut DetectionMatch,
    bytes_sampled: usize,
    truncated: bool,
    encoding: Option<&'static str>,
) {
    use serde_json::Value;

    result
        .metadata
        .entry("catalog_version".to_string())
        .or_insert_with(|| Value::String(CATALOG_SCHEMA_VERSION.to_string()));
    result
        .metadata
        .insert("bytes_sampled".to_string(), Value::Number(bytes_sampled.into()));
    result
        .metadata
        .insert("sample_truncated".to_string(), Value::Bool(truncated));
    if let Some(encoding) = encoding {
        result
            .metadata
            .insert("encoding".to_string(), Value::String(encoding.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::default_registry;

    #[test]
    fn scan_file_populates_mandatory_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appsettings.json");
        std::fs::write(&path, r#"{"Logging":{"Level":"Info"}}"#).unwrap();

        let registry = default_registry();
        let mut orchestrator = DetectorOrchestrator::new(&registry);
        let m = orchestrator.scan_file(&path, &ScanOptions::default()).unwrap();

        assert_eq!(m.format_id.as_deref(), Some("json"));
        assert!(m.metadata.contains_key("bytes_sampled"));
        assert!(m.metadata.contains_key("sample_truncated"));
        assert_eq!(m.metadata.get("encoding").and_then(|v| v.as_str()), Some("utf-8"));
    }

    #[test]
    fn scan_path_is_deterministically_ordered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();

        let registry = default_registry();
        let mut orchestrator = DetectorOrchestrator::new(&registry);
        let token = CancellationToken::new();
        let matches = orchestrator
            .scan_path(dir.path(), &ScanOptions::default(), &token, |_| {})
            .unwrap();

        let names: Vec<_> = matches
            .iter()
            .map(|m| m.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn scan_path_empty_root_yields_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let registry = default_registry();
        let mut orchestrator = DetectorOrchestrator::new(&registry);
        let token = CancellationToken::new();
        let matches = orchestrator
            .scan_path(dir.path(), &ScanOptions::default(), &token, |_| {})
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn invalid_glob_fails_fast_at_configuration_time() {
        let dir = tempfile::tempdir().unwrap();
        let registry = default_registry();
        let mut orchestrator = DetectorOrchestrator::new(&registry);
        let token = CancellationToken::new();
        let options = ScanOptions {
            glob: Some("[".to_string()),
            ..Default::default()
        };
        let result = orchestrator.scan_path(dir.path(), &options, &token, |_| {});
        assert!(result.is_err());
    }
}
