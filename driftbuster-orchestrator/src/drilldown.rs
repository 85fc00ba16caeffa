//! Build the per-config `Drilldown` payload.

use std::collections::BTreeMap;

use driftbuster_core::types::hunt::TokenApproval;
use driftbuster_core::types::server::Drilldown;
use driftbuster_hunt::{collect_token_candidates, HuntRule};
use driftbuster_secrets::SecretRule;

pub const DETECTOR_NAME: &str = "driftbuster-detect";
pub const DETECTOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `diff_snippets`: one entry per non-baseline host, the rendered unified
/// diff text against the baseline. `token_approval_status`: every token
/// discovered by `hunt_rules` in the baseline content, true if an
/// approval for it exists in `approvals`. `secret_exposure`: true if any
/// `secret_rules` pattern matches anywhere in the baseline content.
pub fn build_drilldown(
    config_id: &str,
    baseline_content: Option<&str>,
    diff_snippets: BTreeMap<String, String>,
    hunt_rules: &[HuntRule],
    placeholder_template: &str,
    approvals: &[TokenApproval],
    secret_rules: &[SecretRule],
    scanned_at: i64,
) -> Drilldown {
    let token_approval_status = baseline_content
        .map(|content| token_status_for_content(content, config_id, hunt_rules, placeholder_template, approvals))
        .unwrap_or_default();

    let secret_exposure = baseline_content
        .map(|content| secret_rules.iter().any(|rule| rule.matches_any(content)))
        .unwrap_or(false);

    Drilldown {
        config_id: config_id.to_string(),
        diff_snippets,
        token_approval_status,
        detector_name: DETECTOR_NAME.to_string(),
        detector_version: DETECTOR_VERSION.to_string(),
        scanned_at,
        secret_exposure,
    }
}

fn token_status_for_content(
    content: &str,
    config_id: &str,
    hunt_rules: &[HuntRule],
    placeholder_template: &str,
    approvals: &[TokenApproval],
) -> BTreeMap<String, bool> {
    if hunt_rules.is_empty() {
        return BTreeMap::new();
    }

    let mut hits = Vec::new();
    for (line_number, line) in content.lines().enumerate() {
        for rule in hunt_rules {
            if !rule.prefilter_passes(line) {
                continue;
            }
            let Some(found) = rule.first_match(line) else {
                continue;
            };
            let Some(token_name) = rule.token_name.clone() else {
                continue;
            };
            hits.push(driftbuster_core::types::hunt::HuntHit {
                rule_ref: rule.name.clone(),
                path: config_id.into(),
                line_number: line_number + 1,
                excerpt: line.to_string(),
                relative_path: config_id.to_string(),
                token_name: Some(token_name.clone()),
                plan_transform: Some(driftbuster_core::types::hunt::PlanTransform {
                    value: found.as_str().to_string(),
                    placeholder: placeholder_template.replace("token_name", &token_name),
                }),
            });
        }
    }

    let candidates = collect_token_candidates(&hits, approvals);
    let mut status = BTreeMap::new();
    for (hit, _approval) in &candidates.approved {
        if let Some(name) = &hit.token_name {
            status.insert(name.clone(), true);
        }
    }
    for hit in &candidates.pending {
        if let Some(name) = &hit.token_name {
            status.entry(name.clone()).or_insert(false);
        }
    }
    status
}
