//! `OrchestratorOptions` — the explicit config struct bundling every
//! per-run knob the multi-server orchestrator needs, matching the
//! project-wide "dynamic typing → explicit config structs" convention
//! already followed by `ScanOptions`/`DiffOptions`/`HuntOptions`.

use driftbuster_core::config::{DiffLabels, DiffOptions, MaskToken, ScanOptions};
use driftbuster_hunt::HuntRule;
use driftbuster_secrets::SecretRule;

/// Configuration shared across every host in one `run_server_scans` call.
pub struct OrchestratorOptions {
    /// Applied to every host's `DetectorOrchestrator::scan_path`.
    pub scan: ScanOptions,
    /// Mask tokens applied to every diff; `content_type` and
    /// `labels` are overridden per-pair by the engine and need not be set
    /// here.
    pub mask_tokens: Vec<MaskToken>,
    pub context_lines: usize,
    /// Hunt rules run over each config's baseline content for the
    /// drilldown's `token_approval_status` (empty skips hunting).
    pub hunt_rules: Vec<HuntRule>,
    pub placeholder_template: String,
    /// Secret-scanner rules run over each config's content for the
    /// drilldown's `secret_exposure` indicator (empty skips scanning).
    pub secret_rules: Vec<SecretRule>,
    /// Caller override of the `N = min(#hosts, available parallelism, 8)`
    /// worker bound; `None` uses the documented default.
    pub max_workers: Option<usize>,
    /// `host_id` of the host to force as baseline for every config_id,
    /// overriding majority-content selection.
    pub baseline_override: Option<String>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            mask_tokens: Vec::new(),
            context_lines: 3,
            hunt_rules: Vec::new(),
            placeholder_template: driftbuster_core::constants::DEFAULT_PLACEHOLDER_TEMPLATE.to_string(),
            secret_rules: Vec::new(),
            max_workers: None,
            baseline_override: None,
        }
    }
}

impl OrchestratorOptions {
    /// Build the per-pair `DiffOptions` for one (before_label, after_label)
    /// comparison of a config detected as `format_id`.
    pub(crate) fn diff_options_for(&self, format_id: &str, before_label: &str, after_label: &str) -> DiffOptions {
        DiffOptions {
            content_type: content_type_for_format(format_id),
            labels: DiffLabels {
                before: before_label.to_string(),
                after: after_label.to_string(),
            },
            mask_tokens: self.mask_tokens.clone(),
            context_lines: self.context_lines,
        }
    }
}

/// Map a detected `format_id` onto the diff pipeline's structural
/// canonicalisation family (`ContentType`). Formats with no dedicated
/// canonicaliser (INI, TOML, HCL, Conf, Dockerfile, text, registry
/// exports) fall back to line-based text canonicalisation.
fn content_type_for_format(format_id: &str) -> driftbuster_core::config::ContentType {
    use driftbuster_core::config::ContentType;
    match format_id {
        "xml" => ContentType::Xml,
        "json" => ContentType::Json,
        _ => ContentType::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_structural_formats_to_their_canonicaliser() {
        let options = OrchestratorOptions::default();
        let xml = options.diff_options_for("xml", "a", "b");
        assert_eq!(xml.content_type, driftbuster_core::config::ContentType::Xml);
        let json = options.diff_options_for("json", "a", "b");
        assert_eq!(json.content_type, driftbuster_core::config::ContentType::Json);
        let ini = options.diff_options_for("ini", "a", "b");
        assert_eq!(ini.content_type, driftbuster_core::config::ContentType::Text);
    }
}
