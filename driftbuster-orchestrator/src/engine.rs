//! `MultiServerOrchestrator::run_server_scans` / `run_missing`: a
//! three-phase scan (discovery → processing → diff) generalized from one
//! root to N hosts. Host-level parallelism uses a bounded
//! `rayon::ThreadPool`, each worker owning one `DetectorOrchestrator`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use driftbuster_cache::DiffCache;
use driftbuster_catalog::{Catalog, PluginRegistry};
use driftbuster_core::constants::DEFAULT_MAX_HOST_WORKERS;
use driftbuster_core::traits::cancellation::CancellationToken;
use driftbuster_core::traits::progress::ProgressSink;
use driftbuster_core::types::diff::DiffCacheKey;
use driftbuster_core::types::hunt::TokenApproval;
use driftbuster_core::types::server::{CatalogRow, Drilldown, Presence, ScanProgress, ScanResult, ScanState, ServerScanPlan};
use driftbuster_diff::{build_unified_diff, redactor_fingerprint};

use crate::baseline::choose_baseline;
use crate::catalog_row::build_catalog_row;
use crate::drilldown::build_drilldown;
use crate::errors::OrchestratorError;
use crate::host_scan::{root_signature, scan_host, validate_plans, HostFile, HostOutcome};
use crate::options::OrchestratorOptions;
use crate::prior_run::{PriorRunEntry, PriorRunStore};

const UNKNOWN_FORMATS: [&str; 2] = ["unknown-text-or-binary", "binary-dat"];

/// Coordinates detection, diffing, and aggregation across hosts.
pub struct MultiServerOrchestrator {
    registry: PluginRegistry,
    catalog: Catalog,
    cache: Arc<dyn DiffCache>,
    options: OrchestratorOptions,
}

impl MultiServerOrchestrator {
    pub fn new(registry: PluginRegistry, catalog: Catalog, cache: Arc<dyn DiffCache>, options: OrchestratorOptions) -> Self {
        Self {
            registry,
            catalog,
            cache,
            options,
        }
    }

    /// Run every plan.
    pub fn run_server_scans(
        &self,
        plans: &[ServerScanPlan],
        progress: &dyn ProgressSink,
        cancellation: &CancellationToken,
    ) -> Result<ScanResult, OrchestratorError> {
        self.run_plans(plans, progress, cancellation)
    }

    /// Re-run only hosts whose last recorded state in `prior_run` was not
    /// `succeeded`. Hosts that already succeeded keep
    /// `ScanState::Succeeded` in the result but
    /// contribute no files — callers combining runs should hold onto the
    /// prior `ScanResult` for those hosts.
    pub fn run_missing(
        &self,
        plans: &[ServerScanPlan],
        prior_run: &PriorRunStore,
        progress: &dyn ProgressSink,
        cancellation: &CancellationToken,
    ) -> Result<ScanResult, OrchestratorError> {
        validate_plans(plans)?;
        let snapshot = prior_run.load()?;
        let to_scan: Vec<ServerScanPlan> = plans
            .iter()
            .filter(|p| prior_run.needs_rescan(&p.host_id, &snapshot))
            .cloned()
            .collect();

        let mut result = if to_scan.is_empty() {
            ScanResult::default()
        } else {
            self.run_plans(&to_scan, progress, cancellation)?
        };

        for plan in plans {
            if !prior_run.needs_rescan(&plan.host_id, &snapshot) {
                result.per_host_status.insert(plan.host_id.clone(), ScanState::Succeeded);
            }
        }

        let mut updated = snapshot;
        let now = now_unix();
        for plan in plans {
            if let Some(state) = result.per_host_status.get(&plan.host_id) {
                updated.insert(
                    plan.host_id.clone(),
                    PriorRunEntry {
                        state: *state,
                        last_attempted: now,
                    },
                );
            }
        }
        prior_run.save(&updated)?;

        Ok(result)
    }

    fn worker_count(&self, host_count: usize) -> usize {
        let hardware = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let ceiling = self.options.max_workers.unwrap_or(DEFAULT_MAX_HOST_WORKERS);
        host_count.min(hardware).min(ceiling).max(1)
    }

    fn run_plans(
        &self,
        plans: &[ServerScanPlan],
        progress: &dyn ProgressSink,
        cancellation: &CancellationToken,
    ) -> Result<ScanResult, OrchestratorError> {
        validate_plans(plans)?;

        for plan in plans {
            progress.on_progress(queued_event(&plan.host_id));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count(plans.len()))
            .build()
            .map_err(|e| OrchestratorError::PriorRunReadFailed { detail: e.to_string() })?;

        let per_host_results: Vec<(String, ScanState, Vec<HostFile>)> = pool.install(|| {
            use rayon::prelude::*;
            plans
                .par_iter()
                .map(|plan| self.run_one_host(plan, progress, cancellation))
                .collect()
        });

        let mut per_host_status = BTreeMap::new();
        let mut per_host_files: BTreeMap<String, (PathBuf, Vec<HostFile>)> = BTreeMap::new();
        for ((host_id, state, files), plan) in per_host_results.into_iter().zip(plans.iter()) {
            per_host_status.insert(host_id.clone(), state);
            if state == ScanState::Succeeded {
                let root = plan.roots.first().cloned().unwrap_or_default();
                per_host_files.insert(host_id, (root, files));
            }
        }

        let config_ids = collect_config_ids(&per_host_files);
        let mut catalog_rows = Vec::with_capacity(config_ids.len());
        let mut drilldowns = BTreeMap::new();

        for config_id in config_ids {
            let (row, drilldown) = self.build_row_and_drilldown(&config_id, plans, &per_host_files);
            catalog_rows.push(row);
            drilldowns.insert(config_id, drilldown);
        }

        Ok(ScanResult {
            catalog: catalog_rows,
            drilldowns,
            per_host_status,
        })
    }

    fn run_one_host(
        &self,
        plan: &ServerScanPlan,
        progress: &dyn ProgressSink,
        cancellation: &CancellationToken,
    ) -> (String, ScanState, Vec<HostFile>) {
        if cancellation.is_cancelled() {
            progress.on_progress(state_event(&plan.host_id, ScanState::Skipped, None));
            return (plan.host_id.clone(), ScanState::Skipped, Vec::new());
        }

        progress.on_progress(state_event(&plan.host_id, ScanState::Running, None));
        let outcome = scan_host(plan, &self.registry, &self.options.scan, cancellation);

        let (state, files, reason) = match outcome {
            HostOutcome::Scanned(files) => (ScanState::Succeeded, files, None),
            HostOutcome::PermissionDenied => (ScanState::PermissionDenied, Vec::new(), Some("permission denied".to_string())),
            HostOutcome::Offline => (ScanState::Offline, Vec::new(), Some("host unreachable".to_string())),
            HostOutcome::Failed(detail) => (ScanState::Failed, Vec::new(), Some(detail)),
            HostOutcome::Skipped => (ScanState::Skipped, Vec::new(), None),
        };
        progress.on_progress(state_event(&plan.host_id, state, reason));
        (plan.host_id.clone(), state, files)
    }

    fn build_row_and_drilldown(
        &self,
        config_id: &str,
        plans: &[ServerScanPlan],
        per_host_files: &BTreeMap<String, (PathBuf, Vec<HostFile>)>,
    ) -> (CatalogRow, Drilldown) {
        let mut per_host_presence = BTreeMap::new();
        let mut format_ids = Vec::new();
        let mut last_updated = 0i64;
        let mut contents: BTreeMap<String, String> = BTreeMap::new();
        let mut host_format: BTreeMap<String, String> = BTreeMap::new();
        let mut host_root: BTreeMap<String, PathBuf> = BTreeMap::new();

        for (host_id, (root, files)) in per_host_files {
            let matching = files.iter().find(|f| f.config_id == config_id);
            match matching {
                Some(file) => {
                    per_host_presence.insert(host_id.clone(), Presence::Found);
                    format_ids.push(file.format_id.clone());
                    last_updated = last_updated.max(file.mtime);
                    host_format.insert(host_id.clone(), file.format_id.clone());
                    host_root.insert(host_id.clone(), root.clone());
                    if let Some(content) = &file.content {
                        if !UNKNOWN_FORMATS.contains(&file.format_id.as_str()) {
                            contents.insert(host_id.clone(), content.clone());
                        }
                    }
                }
                None => {
                    per_host_presence.insert(host_id.clone(), Presence::Missing);
                }
            }
        }

        let override_host = self
            .options
            .baseline_override
            .clone()
            .or_else(|| plan_baseline_preference(plans, &per_host_presence));
        let baseline_host = choose_baseline(&contents, override_host.as_deref());

        let mut diff_snippets = BTreeMap::new();
        let mut drift_count = 0usize;

        if let Some(baseline_host) = &baseline_host {
            let baseline_content = contents.get(baseline_host).cloned().unwrap_or_default();
            let baseline_format = host_format.get(baseline_host).cloned().unwrap_or_default();
            let baseline_root = host_root.get(baseline_host).cloned().unwrap_or_default();

            for (host_id, content) in &contents {
                if host_id == baseline_host {
                    continue;
                }
                match self.diffed_against_baseline(
                    host_id,
                    config_id,
                    &baseline_root,
                    &baseline_content,
                    content,
                    &baseline_format,
                    baseline_host,
                ) {
                    Ok(result) => {
                        if result.stats.added + result.stats.removed + result.stats.changed > 0 {
                            drift_count += 1;
                        }
                        diff_snippets.insert(host_id.clone(), result.diff_text);
                    }
                    Err(_) => {
                        per_host_presence.insert(host_id.clone(), Presence::Error);
                    }
                }
            }

            let row = build_catalog_row(
                config_id.to_string(),
                per_host_presence,
                &format_ids,
                drift_count,
                last_updated,
                &self.catalog,
            );
            let drilldown = build_drilldown(
                config_id,
                Some(&baseline_content),
                diff_snippets,
                &self.options.hunt_rules,
                &self.options.placeholder_template,
                &self.approvals_placeholder(),
                &self.options.secret_rules,
                now_unix(),
            );
            (row, drilldown)
        } else {
            let row = build_catalog_row(
                config_id.to_string(),
                per_host_presence,
                &format_ids,
                0,
                last_updated,
                &self.catalog,
            );
            let drilldown = build_drilldown(
                config_id,
                None,
                BTreeMap::new(),
                &self.options.hunt_rules,
                &self.options.placeholder_template,
                &[],
                &self.options.secret_rules,
                now_unix(),
            );
            (row, drilldown)
        }
    }

    /// Token approvals are loaded once per scan by the caller and threaded
    /// through options in a fuller integration; this engine exposes the
    /// seam without owning an `ApprovalStore` itself, so for now
    /// drilldowns report every discovered token as pending. Left as an
    /// explicit empty slice rather than guessed approvals.
    fn approvals_placeholder(&self) -> Vec<TokenApproval> {
        Vec::new()
    }

    #[allow(clippy::too_many_arguments)]
    fn diffed_against_baseline(
        &self,
        host_id: &str,
        config_id: &str,
        baseline_root: &std::path::Path,
        baseline_content: &str,
        host_content: &str,
        format_id: &str,
        baseline_host: &str,
    ) -> Result<driftbuster_core::types::diff::DiffResult, OrchestratorError> {
        let diff_options = self.options.diff_options_for(format_id, baseline_host, host_id);
        let key = DiffCacheKey {
            host_id: host_id.to_string(),
            config_id: config_id.to_string(),
            root_sig: root_signature(&[baseline_root.to_path_buf()]),
            input_hash_before: content_hash(baseline_content),
            input_hash_after: content_hash(host_content),
            redactor_fingerprint: redactor_fingerprint(&self.options.mask_tokens),
        };

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let result = build_unified_diff(baseline_content, host_content, &diff_options)
            .map_err(|e| OrchestratorError::DiffFailed { detail: e.to_string() })?;

        if let Err(e) = self.cache.put(&key, &result) {
            tracing::warn!(detail = %e, "diff cache write failed; continuing without caching");
        }
        Ok(result)
    }
}

fn plan_baseline_preference(plans: &[ServerScanPlan], presence: &BTreeMap<String, Presence>) -> Option<String> {
    plans
        .iter()
        .find(|p| p.baseline_pref == Some(true) && presence.get(&p.host_id) == Some(&Presence::Found))
        .map(|p| p.host_id.clone())
}

fn collect_config_ids(per_host_files: &BTreeMap<String, (PathBuf, Vec<HostFile>)>) -> Vec<String> {
    let mut ids: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
    for (_, files) in per_host_files.values() {
        for file in files {
            ids.insert(file.config_id.clone());
        }
    }
    ids.into_iter().collect()
}

fn content_hash(content: &str) -> String {
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(content.as_bytes()))
}

fn now_unix() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0)
}

fn queued_event(host_id: &str) -> ScanProgress {
    state_event(host_id, ScanState::Queued, None)
}

fn state_event(host_id: &str, state: ScanState, reason: Option<String>) -> ScanProgress {
    ScanProgress {
        host_id: host_id.to_string(),
        state,
        timestamp: now_unix(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftbuster_cache::FsDiffCache;
    use driftbuster_core::config::CacheOptions;
    use driftbuster_core::traits::progress::NullProgressSink;
    use driftbuster_detect::default_registry;

    fn orchestrator(dir: &std::path::Path) -> MultiServerOrchestrator {
        let cache = Arc::new(FsDiffCache::open(dir.join("cache"), CacheOptions::default()));
        MultiServerOrchestrator::new(default_registry(), Catalog::builtin().unwrap(), cache, OrchestratorOptions::default())
    }

    fn plan(host_id: &str, root: &std::path::Path) -> ServerScanPlan {
        ServerScanPlan {
            host_id: host_id.to_string(),
            label: host_id.to_string(),
            roots: vec![root.to_path_buf()],
            scope: None,
            baseline_pref: None,
            throttle: None,
        }
    }

    #[test]
    fn three_host_catalog_reflects_majority_baseline_and_drift() {
        let root = tempfile::tempdir().unwrap();
        let h1 = root.path().join("h1");
        let h2 = root.path().join("h2");
        let h3 = root.path().join("h3");
        for (dir, level) in [(&h1, "Info"), (&h2, "Info"), (&h3, "Debug")] {
            std::fs::create_dir_all(dir.join("app")).unwrap();
            std::fs::write(
                dir.join("app/appsettings.json"),
                format!(r#"{{"Logging":{{"Level":"{level}"}}}}"#),
            )
            .unwrap();
        }

        let cache_dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(cache_dir.path());
        let plans = vec![plan("h1", &h1), plan("h2", &h2), plan("h3", &h3)];
        let sink = NullProgressSink;
        let token = CancellationToken::new();

        let result = orchestrator.run_server_scans(&plans, &sink, &token).unwrap();

        assert_eq!(result.per_host_status.len(), 3);
        assert!(result.per_host_status.values().all(|s| *s == ScanState::Succeeded));
        assert_eq!(result.catalog.len(), 1);
        let row = &result.catalog[0];
        assert_eq!(row.config_id, "app/appsettings.json");
        assert_eq!(row.drift_count, 1);
        assert_eq!(row.format_id, "json");
        assert_eq!(row.per_host_presence.len(), 3);
    }

    #[test]
    fn empty_roots_produce_empty_catalog_and_succeeded_host() {
        let root = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(cache_dir.path());
        let empty_root = root.path().join("empty");
        std::fs::create_dir_all(&empty_root).unwrap();
        let plans = vec![plan("h1", &empty_root)];
        let sink = NullProgressSink;
        let token = CancellationToken::new();

        let result = orchestrator.run_server_scans(&plans, &sink, &token).unwrap();
        assert!(result.catalog.is_empty());
        assert_eq!(result.per_host_status.get("h1"), Some(&ScanState::Succeeded));
    }

    #[test]
    fn no_plans_is_rejected() {
        let cache_dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(cache_dir.path());
        let sink = NullProgressSink;
        let token = CancellationToken::new();
        let result = orchestrator.run_server_scans(&[], &sink, &token);
        assert!(matches!(result, Err(OrchestratorError::NoPlans)));
    }

    #[test]
    fn repeated_run_reuses_cache_and_is_byte_identical() {
        let root = tempfile::tempdir().unwrap();
        let h1 = root.path().join("h1");
        let h2 = root.path().join("h2");
        for (dir, level) in [(&h1, "Info"), (&h2, "Debug")] {
            std::fs::create_dir_all(dir).unwrap();
            std::fs::write(dir.join("a.json"), format!(r#"{{"level":"{level}"}}"#)).unwrap();
        }

        let cache_dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(cache_dir.path());
        let plans = vec![plan("h1", &h1), plan("h2", &h2)];
        let sink = NullProgressSink;
        let token = CancellationToken::new();

        let first = orchestrator.run_server_scans(&plans, &sink, &token).unwrap();
        let second = orchestrator.run_server_scans(&plans, &sink, &token).unwrap();
        assert_eq!(first.catalog, second.catalog);
        assert_eq!(first.drilldowns, second.drilldowns);
    }
}
