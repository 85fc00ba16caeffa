//! Compiled hunt rules: an `aho-corasick` keyword prefilter gates an
//! expensive per-rule `regex::Regex` pass, a cheap prefilter before
//! expensive regex.

use aho_corasick::AhoCorasick;
use driftbuster_core::types::hunt::HuntRuleSpec;
use regex::Regex;

use crate::errors::HuntError;

/// A `HuntRuleSpec` with its keyword prefilter and patterns precompiled
/// once, then reused across every file in a `hunt_path` call.
pub struct HuntRule {
    pub name: String,
    pub description: String,
    pub token_name: Option<String>,
    keywords: Option<AhoCorasick>,
    patterns: Vec<Regex>,
}

impl HuntRule {
    /// Compile a rule spec. Fails if any pattern is not valid regex, or
    /// the keyword automaton cannot be built. Patterns are precompiled;
    /// keywords are case-insensitive substring prefilters.
    pub fn compile(spec: &HuntRuleSpec) -> Result<Self, HuntError> {
        let keywords = if spec.keywords.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(spec.keywords.iter())
                    .map_err(|e| HuntError::RuleCompileFailed {
                        rule: spec.name.clone(),
                        detail: e.to_string(),
                    })?,
            )
        };

        let patterns = spec
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| HuntError::RuleCompileFailed {
                    rule: spec.name.clone(),
                    detail: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            token_name: spec.token_name.clone(),
            keywords,
            patterns,
        })
    }

    /// Does this rule's keyword prefilter allow `line` through to the
    /// (more expensive) regex pass? A rule with no configured keywords
    /// always passes the prefilter.
    pub fn prefilter_passes(&self, line: &str) -> bool {
        match &self.keywords {
            Some(automaton) => automaton.is_match(line),
            None => true,
        }
    }

    /// First pattern match on `line`, if any.
    pub fn first_match<'a>(&self, line: &'a str) -> Option<regex::Match<'a>> {
        self.patterns.iter().find_map(|re| re.find(line))
    }

    /// Replace every match of every pattern in `line` with `replacement`,
    /// gated by the same keyword prefilter as `first_match`. Returns
    /// `None` if nothing matched, so callers can tell an untouched line
    /// from one that happened to redact to itself. Shared with the secret
    /// scanner, where a rule has no `token_name` and exists purely to
    /// mask matches rather than extract them.
    pub fn redact_matches(&self, line: &str, replacement: &str) -> Option<String> {
        if !self.prefilter_passes(line) {
            return None;
        }
        let mut matched = false;
        let mut result = line.to_string();
        for pattern in &self.patterns {
            if pattern.is_match(&result) {
                matched = true;
                result = pattern.replace_all(&result, replacement).into_owned();
            }
        }
        matched.then_some(result)
    }
}
