//! `build_unified_diff` and `execute_diff_plan`. The unified diff text
//! and line stats are built on the `similar` crate's Myers diff.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use driftbuster_core::config::{ContentType, DiffOptions};
use driftbuster_core::types::diff::{DiffResult, DiffStats};

use crate::canonicalize::{canonicalise_json, canonicalise_text, canonicalise_xml};
use crate::errors::DiffError;
use crate::redact::apply_masks;

/// Canonicalise, mask, and diff `before`/`after` per `options`, producing
/// a deterministic `DiffResult`.
pub fn build_unified_diff(before: &str, after: &str, options: &DiffOptions) -> Result<DiffResult, DiffError> {
    let (mut canonical_before, mut canonical_after, canonicalisation_fallback) = match options.content_type {
        ContentType::Text => (canonicalise_text(before), canonicalise_text(after), false),
        ContentType::Xml => {
            let b = canonicalise_xml(before);
            let a = canonicalise_xml(after);
            let fell_back = b.fell_back || a.fell_back;
            (b.text, a.text, fell_back)
        }
        ContentType::Json => {
            let b = canonicalise_json(before);
            let a = canonicalise_json(after);
            let fell_back = b.fell_back || a.fell_back;
            (b.text, a.text, fell_back)
        }
    };

    let redactions = apply_masks(&mut canonical_before, &mut canonical_after, &options.mask_tokens)?;
    let masked_flag = !options.mask_tokens.is_empty();

    // An unresolved redaction leaves the raw value in the text (see
    // `apply_masks`), so the lines it touches are a real, unconfirmed
    // difference rather than a benign substitution; don't fold those
    // into `changed`.
    let fold_replacements = redactions.iter().all(|r| r.expected);
    let stats = compute_stats(&canonical_before, &canonical_after, fold_replacements);
    let diff_text = TextDiff::from_lines(&canonical_before, &canonical_after)
        .unified_diff()
        .context_radius(options.context_lines)
        .header(&options.labels.before, &options.labels.after)
        .to_string();

    Ok(DiffResult {
        canonical_before,
        canonical_after,
        diff_text,
        stats,
        redactions,
        masked_flag,
        canonicalisation_fallback,
    })
}

/// Count raw inserted/deleted lines, then, when `fold_replacements` is
/// set, fold the overlap into `changed` (a line present as both a delete
/// and an insert in the same diff is a modification, not an independent
/// add and remove).
fn compute_stats(before: &str, after: &str, fold_replacements: bool) -> DiffStats {
    let diff = TextDiff::from_lines(before, after);
    let mut added = 0usize;
    let mut removed = 0usize;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    if !fold_replacements {
        return DiffStats { added, removed, changed: 0 };
    }
    let changed = added.min(removed);
    DiffStats {
        added: added - changed,
        removed: removed - changed,
        changed,
    }
}

/// Pure-data description of a planned diff, serialisable for later
/// execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffPlan {
    pub before: String,
    pub after: String,
    pub options: DiffOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub plan: DiffPlan,
    pub result: DiffResult,
    pub summary: Option<String>,
}

/// Run a `DiffPlan`, optionally attaching a caller-supplied summary of the
/// result.
pub fn execute_diff_plan(
    plan: DiffPlan,
    summarise: Option<&dyn Fn(&DiffResult) -> String>,
) -> Result<ExecutionResult, DiffError> {
    let result = build_unified_diff(&plan.before, &plan.after, &plan.options)?;
    let summary = summarise.map(|f| f(&result));
    Ok(ExecutionResult { plan, result, summary })
}
