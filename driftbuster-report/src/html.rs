//! `render_html_report` — a single compiled `askama` template producing
//! a self-contained HTML summary. Every diff body is masked again before
//! being bound into the template context, so a caller who forgets to mask
//! a `DiffResult` upstream still gets a safe report.

use std::collections::BTreeMap;

use askama::Template;
use driftbuster_core::config::MaskToken;
use driftbuster_core::types::diff::DiffResult;

use crate::errors::ReportError;
use crate::payload::DetectionPayload;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    payloads: &'a [DetectionPayload],
    diffs: Vec<MaskedDiff>,
}

struct MaskedDiff {
    config_id: String,
    diff_text: String,
}

pub fn render_html_report(
    payloads: &[DetectionPayload],
    diff_results: &BTreeMap<String, DiffResult>,
    mask_tokens: &[MaskToken],
) -> Result<String, ReportError> {
    let mut diffs = Vec::with_capacity(diff_results.len());
    for (config_id, diff) in diff_results {
        diffs.push(MaskedDiff {
            config_id: config_id.clone(),
            diff_text: mask_text(&diff.diff_text, mask_tokens)?,
        });
    }

    let template = ReportTemplate { payloads, diffs };
    template.render().map_err(|e| ReportError::TemplateFailed { detail: e.to_string() })
}

/// Replace every mask-token match in `text` with its `{{ token_name }}`
/// placeholder, unconditionally. A rendered report has no "expected vs.
/// unresolved" distinction to preserve, only the requirement that masked
/// values never appear in the output.
fn mask_text(text: &str, mask_tokens: &[MaskToken]) -> Result<String, ReportError> {
    let mut masked = text.to_string();
    for mask_token in mask_tokens {
        let re = regex::Regex::new(&mask_token.pattern)
            .map_err(|e| ReportError::TemplateFailed { detail: e.to_string() })?;
        let placeholder = format!("{{{{ {} }}}}", mask_token.token_name);
        masked = re.replace_all(&masked, placeholder.as_str()).into_owned();
    }
    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftbuster_core::types::diff::DiffStats;
    use crate::payload::{iter_detection_payloads, HuntSummaryPayload};

    fn payload() -> DetectionPayload {
        DetectionPayload {
            plugin: "json".to_string(),
            format: "json".to_string(),
            variant: None,
            confidence: 0.9,
            reasons: vec!["file extension is .json".to_string()],
            metadata: serde_json::json!({"catalog_version": "1.0"}),
            hunts: HuntSummaryPayload::default(),
        }
    }

    #[test]
    fn renders_without_error_and_contains_plugin_name() {
        let payloads = vec![payload()];
        let mut diffs = BTreeMap::new();
        diffs.insert(
            "app/appsettings.json".to_string(),
            DiffResult {
                canonical_before: "a".to_string(),
                canonical_after: "b".to_string(),
                diff_text: "Server=prod-db-01.internal;".to_string(),
                stats: DiffStats {
                    added: 1,
                    removed: 1,
                    changed: 0,
                },
                redactions: Vec::new(),
                masked_flag: false,
                canonicalisation_fallback: false,
            },
        );
        let mask_tokens = vec![MaskToken {
            token_name: "database_server".to_string(),
            pattern: r"prod-db-\d+\.internal".to_string(),
        }];

        let html = render_html_report(&payloads, &diffs, &mask_tokens).unwrap();
        assert!(html.contains("json"));
        assert!(html.contains("{{ database_server }}"));
        assert!(!html.contains("prod-db-01.internal"));
        let _ = iter_detection_payloads(&[], None, None);
    }
}
