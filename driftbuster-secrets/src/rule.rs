//! A secret rule is a `driftbuster_hunt::HuntRule` with no `token_name` —
//! the hunt engine and secret scanner both read the same samples, but a
//! secret scanner masks rather than extracts — plus a severity tier used
//! to rank findings.

use driftbuster_core::types::hunt::HuntRuleSpec;
use driftbuster_hunt::HuntRule;
use serde::{Deserialize, Serialize};

use crate::errors::SecretsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretRuleSpec {
    #[serde(flatten)]
    pub spec: HuntRuleSpec,
    pub severity: Severity,
}

pub struct SecretRule {
    pub(crate) inner: HuntRule,
    pub severity: Severity,
}

impl SecretRule {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn compile(spec: &SecretRuleSpec) -> Result<Self, SecretsError> {
        if spec.spec.token_name.is_some() {
            return Err(SecretsError::RuleHasTokenName {
                rule: spec.spec.name.clone(),
            });
        }
        let inner = HuntRule::compile(&spec.spec).map_err(|e| SecretsError::RuleCompileFailed {
            rule: spec.spec.name.clone(),
            detail: e.to_string(),
        })?;
        Ok(Self {
            inner,
            severity: spec.severity,
        })
    }

    pub fn redact_matches(&self, line: &str, replacement: &str) -> Option<String> {
        self.inner.redact_matches(line, replacement)
    }

    /// Does any line of `text` match this rule? Used for a cheap
    /// secret-exposure indicator where a caller only needs a yes/no
    /// answer, not the masked copy (e.g. multi-server drilldown payloads).
    pub fn matches_any(&self, text: &str) -> bool {
        text.lines().any(|line| self.inner.redact_matches(line, "[SECRET]").is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn spec(name: &str, token_name: Option<&str>) -> SecretRuleSpec {
        SecretRuleSpec {
            spec: HuntRuleSpec {
                name: name.to_string(),
                description: "aws access key".to_string(),
                token_name: token_name.map(str::to_string),
                keywords: BTreeSet::from(["AKIA".to_string()]),
                patterns: vec![r"AKIA[0-9A-Z]{16}".to_string()],
            },
            severity: Severity::High,
        }
    }

    #[test]
    fn rejects_rule_with_token_name() {
        let result = SecretRule::compile(&spec("aws-key", Some("aws_key")));
        assert!(matches!(result, Err(SecretsError::RuleHasTokenName { .. })));
    }

    #[test]
    fn compiles_token_free_rule() {
        let rule = SecretRule::compile(&spec("aws-key", None)).unwrap();
        assert_eq!(rule.name(), "aws-key");
        assert_eq!(rule.severity, Severity::High);
    }
}
