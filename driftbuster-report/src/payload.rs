//! `iter_detection_payloads` — render detection + hunt results into the
//! JSON payload contract. Typed serde structs assembled in plain
//! functions, never a raw `serde_json::json!` tree, so every key in the
//! contract has a named field a reader can grep for.

use std::path::PathBuf;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::types::hunt::{HuntHit, TokenApproval};
use driftbuster_hunt::{collect_token_candidates, HuntRule};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RulePayload {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanTransformPayload {
    pub value: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HuntMetadataPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_transform: Option<PlanTransformPayload>,
}

/// Hunt payload contract: `{ rule: { name, description, token_name? },
/// path, relative_path, line_number, excerpt, metadata: { plan_transform?
/// } }`.
#[derive(Debug, Clone, Serialize)]
pub struct HuntPayload {
    pub rule: RulePayload,
    pub path: PathBuf,
    pub relative_path: String,
    pub line_number: usize,
    pub excerpt: String,
    pub metadata: HuntMetadataPayload,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct HuntSummaryPayload {
    pub approved_tokens: Vec<HuntPayload>,
    pub pending_reviews: Vec<HuntPayload>,
}

/// Detection payload contract: `{ plugin, format, variant, confidence,
/// reasons, metadata, hunts.approved_tokens, hunts.pending_reviews }`
///. `plugin` is the detecting plugin's name, which this
/// catalog's plugins keep identical to their `format_id` (one plugin per
/// format), so it is sourced from `format_id` rather than a field the
/// core does not track separately.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionPayload {
    pub plugin: String,
    pub format: String,
    pub variant: Option<String>,
    pub confidence: f32,
    pub reasons: Vec<String>,
    pub metadata: serde_json::Value,
    pub hunts: HuntSummaryPayload,
}

/// Hunt hits and the rules/approvals needed to classify them, threaded
/// alongside detection matches so payloads can report which tokens in a
/// file are approved versus pending review.
pub struct HuntContext<'a> {
    pub hits: &'a [HuntHit],
    pub rules: &'a [HuntRule],
    pub approvals: &'a [TokenApproval],
}

/// Build one `DetectionPayload` per match, with `extra_metadata` merged
/// into each payload's `metadata` object without overwriting the
/// mandatory `catalog_*` keys.
pub fn iter_detection_payloads(
    matches: &[DetectionMatch],
    hunt_context: Option<&HuntContext<'_>>,
    extra_metadata: Option<&serde_json::Map<String, serde_json::Value>>,
) -> Vec<DetectionPayload> {
    matches
        .iter()
        .map(|detection| build_payload(detection, hunt_context, extra_metadata))
        .collect()
}

fn build_payload(
    detection: &DetectionMatch,
    hunt_context: Option<&HuntContext<'_>>,
    extra_metadata: Option<&serde_json::Map<String, serde_json::Value>>,
) -> DetectionPayload {
    let format = detection
        .format_id
        .clone()
        .unwrap_or_else(|| "unknown-text-or-binary".to_string());

    let mut metadata = serde_json::Map::new();
    for (key, value) in &detection.metadata {
        metadata.insert(key.clone(), value.clone());
    }
    if let Some(extra) = extra_metadata {
        for (key, value) in extra {
            metadata.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    let hunts = hunt_context
        .map(|ctx| hunt_summary_for(detection, ctx))
        .unwrap_or_default();

    DetectionPayload {
        plugin: format.clone(),
        format,
        variant: detection.variant.clone(),
        confidence: detection.confidence,
        reasons: detection.reasons.clone(),
        metadata: serde_json::Value::Object(metadata),
        hunts,
    }
}

fn hunt_summary_for(detection: &DetectionMatch, ctx: &HuntContext<'_>) -> HuntSummaryPayload {
    let matching: Vec<HuntHit> = ctx
        .hits
        .iter()
        .filter(|hit| hit.path == detection.path)
        .cloned()
        .collect();
    if matching.is_empty() {
        return HuntSummaryPayload::default();
    }

    let candidates = collect_token_candidates(&matching, ctx.approvals);
    HuntSummaryPayload {
        approved_tokens: candidates.approved.into_iter().map(|(hit, _)| hunt_payload(&hit, ctx.rules)).collect(),
        pending_reviews: candidates.pending.into_iter().map(|hit| hunt_payload(&hit, ctx.rules)).collect(),
    }
}

fn hunt_payload(hit: &HuntHit, rules: &[HuntRule]) -> HuntPayload {
    let rule = rules.iter().find(|r| r.name == hit.rule_ref);
    HuntPayload {
        rule: RulePayload {
            name: hit.rule_ref.clone(),
            description: rule.map(|r| r.description.clone()).unwrap_or_default(),
            token_name: hit.token_name.clone(),
        },
        path: hit.path.clone(),
        relative_path: hit.relative_path.clone(),
        line_number: hit.line_number,
        excerpt: hit.excerpt.clone(),
        metadata: HuntMetadataPayload {
            plan_transform: hit.plan_transform.as_ref().map(|t| PlanTransformPayload {
                value: t.value.clone(),
                placeholder: t.placeholder.clone(),
            }),
        },
    }
}
