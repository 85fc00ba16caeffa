//! `hunt_path` — scans text content for rule hits.

use std::collections::BTreeSet;
use std::path::Path;

use driftbuster_core::types::hunt::{HuntHit, PlanTransform};
use driftbuster_detect::sampling::codec::decode_sample;

use crate::errors::HuntError;
use crate::rule::HuntRule;

/// Filter + decode + rule-match every file under `root`, producing one
/// `HuntHit` per `(file, line, rule)` match, deduplicated within the
/// same file+line+rule.
pub fn hunt_path(
    root: &Path,
    rules: &[HuntRule],
    glob: Option<&str>,
    exclude_patterns: &[String],
    placeholder_template: &str,
) -> Result<Vec<HuntHit>, HuntError> {
    let glob_pattern = match glob {
        Some(pattern) => Some(glob::Pattern::new(pattern).map_err(|_| HuntError::MalformedGlob {
            pattern: pattern.to_string(),
        })?),
        None => None,
    };
    let exclude_patterns: Vec<glob::Pattern> = exclude_patterns
        .iter()
        .filter_map(|p| glob::Pattern::new(p).ok())
        .collect();

    let mut hits = Vec::new();
    let mut seen: BTreeSet<(String, usize, String)> = BTreeSet::new();

    let mut paths: Vec<_> = walkdir_files(root);
    paths.sort();

    for path in paths {
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        if let Some(pattern) = &glob_pattern {
            if !pattern.matches_path(&path) && !pattern.matches(&relative) {
                continue;
            }
        }
        if exclude_patterns
            .iter()
            .any(|p| p.matches_path(&path) || p.matches(&relative))
        {
            continue;
        }

        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        let decoded = decode_sample(&bytes);
        let Some(text) = decoded.text else {
            continue;
        };

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            for rule in rules {
                if !rule.prefilter_passes(line) {
                    continue;
                }
                let Some(found) = rule.first_match(line) else {
                    continue;
                };

                let dedup_key = (relative.clone(), line_number, rule.name.clone());
                if !seen.insert(dedup_key) {
                    continue;
                }

                let plan_transform = rule.token_name.as_ref().map(|token_name| PlanTransform {
                    value: found.as_str().to_string(),
                    placeholder: placeholder_template.replace("token_name", token_name),
                });

                hits.push(HuntHit {
                    rule_ref: rule.name.clone(),
                    path: path.clone(),
                    line_number,
                    excerpt: line.to_string(),
                    relative_path: relative.clone(),
                    token_name: rule.token_name.clone(),
                    plan_transform,
                });
            }
        }
    }

    Ok(hits)
}

fn walkdir_files(root: &Path) -> Vec<std::path::PathBuf> {
    ignore::WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
        .map(|e| e.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftbuster_core::types::hunt::HuntRuleSpec;
    use std::collections::BTreeSet as Set;

    fn spec() -> HuntRuleSpec {
        HuntRuleSpec {
            name: "database-connection".to_string(),
            description: "database connection string".to_string(),
            token_name: Some("database_server".to_string()),
            keywords: Set::from(["Server".to_string()]),
            patterns: vec![r"prod-db-\d+\.internal".to_string()],
        }
    }

    #[test]
    fn finds_hit_with_plan_transform() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("conn.txt"), "Server=prod-db-01.internal;\n").unwrap();

        let rule = HuntRule::compile(&spec()).unwrap();
        let hits = hunt_path(dir.path(), &[rule], None, &[], "{{ token_name }}").unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].token_name.as_deref(), Some("database_server"));
        assert_eq!(hits[0].plan_transform.as_ref().unwrap().value, "prod-db-01.internal");
    }

    #[test]
    fn deduplicates_same_file_line_rule() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("conn.txt"),
            "Server=prod-db-01.internal; Server=prod-db-02.internal;\n",
        )
        .unwrap();

        let rule = HuntRule::compile(&spec()).unwrap();
        let hits = hunt_path(dir.path(), &[rule], None, &[], "{{ token_name }}").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn respects_exclude_patterns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor/conn.txt"), "Server=prod-db-01.internal;\n").unwrap();

        let rule = HuntRule::compile(&spec()).unwrap();
        let hits = hunt_path(dir.path(), &[rule], None, &["vendor/**".to_string()], "{{ token_name }}").unwrap();
        assert!(hits.is_empty());
    }
}
