//! `build_plan_transforms` and `collect_token_candidates`.

use std::collections::BTreeSet;

use driftbuster_core::types::hunt::{HuntHit, TokenApproval};

/// One planned token substitution, deduplicated by `(file, line,
/// token_name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTransform {
    pub token_name: String,
    pub placeholder: String,
    pub value: String,
}

pub fn build_plan_transforms(hits: &[HuntHit], template: &str) -> Vec<PlannedTransform> {
    let mut seen: BTreeSet<(String, usize, String)> = BTreeSet::new();
    let mut out = Vec::new();

    for hit in hits {
        let Some(token_name) = &hit.token_name else {
            continue;
        };
        let key = (hit.relative_path.clone(), hit.line_number, token_name.clone());
        if !seen.insert(key) {
            continue;
        }
        let Some(transform) = &hit.plan_transform else {
            continue;
        };
        out.push(PlannedTransform {
            token_name: token_name.clone(),
            placeholder: template.replace("token_name", token_name),
            value: transform.value.clone(),
        });
    }
    out
}

/// Hits aligned against the approval store: `approved` carries the
/// matching `TokenApproval`; everything else is `pending`.
#[derive(Debug, Clone, Default)]
pub struct TokenCandidates {
    pub approved: Vec<(HuntHit, TokenApproval)>,
    pub pending: Vec<HuntHit>,
}

pub fn collect_token_candidates(hits: &[HuntHit], approvals: &[TokenApproval]) -> TokenCandidates {
    let mut candidates = TokenCandidates::default();
    for hit in hits {
        let approval = hit
            .token_name
            .as_ref()
            .and_then(|name| approvals.iter().find(|a| &a.token_name == name));
        match approval {
            Some(approval) => candidates.approved.push((hit.clone(), approval.clone())),
            None => candidates.pending.push(hit.clone()),
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftbuster_core::types::hunt::{PlanTransform, Sensitivity};
    use std::path::PathBuf;

    fn hit(line: usize, token_name: &str, value: &str) -> HuntHit {
        HuntHit {
            rule_ref: "database-connection".to_string(),
            path: PathBuf::from("conn.txt"),
            line_number: line,
            excerpt: format!("Server={value}"),
            relative_path: "conn.txt".to_string(),
            token_name: Some(token_name.to_string()),
            plan_transform: Some(PlanTransform {
                value: value.to_string(),
                placeholder: format!("{{{{ {token_name} }}}}"),
            }),
        }
    }

    #[test]
    fn build_plan_transforms_dedupes_by_file_line_token() {
        let hits = vec![hit(1, "database_server", "prod-db-01"), hit(1, "database_server", "prod-db-01")];
        let transforms = build_plan_transforms(&hits, "{{ token_name }}");
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].placeholder, "{{ database_server }}");
    }

    #[test]
    fn collect_token_candidates_separates_approved_and_pending() {
        let hits = vec![hit(1, "database_server", "prod-db-01")];
        let approvals = vec![TokenApproval {
            token_name: "database_server".to_string(),
            source_rule: "database-connection".to_string(),
            value_hash: "hash".to_string(),
            last_confirmed: 0,
            approved_by: "op1".to_string(),
            sensitivity: Sensitivity::Medium,
        }];

        let candidates = collect_token_candidates(&hits, &approvals);
        assert_eq!(candidates.approved.len(), 1);
        assert!(candidates.pending.is_empty());

        let candidates_no_approval = collect_token_candidates(&hits, &[]);
        assert!(candidates_no_approval.approved.is_empty());
        assert_eq!(candidates_no_approval.pending.len(), 1);
    }
}
