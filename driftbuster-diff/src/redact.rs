//! Redaction: masks dynamic values in canonical text before diffing, and
//! computes the `redactor_fingerprint` used to invalidate cache entries
//! when the mask-token set changes.

use driftbuster_core::config::MaskToken;
use driftbuster_core::constants::{unresolved_token_placeholder, DEFAULT_PLACEHOLDER_TEMPLATE};
use driftbuster_core::types::diff::Redaction;

use crate::errors::DiffError;

fn placeholder_for(token_name: &str) -> String {
    DEFAULT_PLACEHOLDER_TEMPLATE.replace("token_name", token_name)
}

/// Apply every mask token to `before`/`after`, mutating both in place, and
/// return the `Redaction` entries produced. Masking runs before diff
/// generation so placeholders appear in both canonical forms and stats.
///
/// A token is only collapsed to the `{{ token_name }}` placeholder when
/// that placeholder already appears in the input — i.e. the value was
/// pre-redacted upstream and this rule is just confirming it. When the
/// pattern instead matches a raw, never-redacted value, the match is
/// prefixed with the `[[TOKEN:name]]` fallback rather than replaced
/// outright: the raw value stays visible (and the two sides stay
/// diffable) until the token is formally approved.
pub fn apply_masks(
    before: &mut String,
    after: &mut String,
    mask_tokens: &[MaskToken],
) -> Result<Vec<Redaction>, DiffError> {
    let mut redactions = Vec::with_capacity(mask_tokens.len());

    for mask_token in mask_tokens {
        let re = regex::Regex::new(&mask_token.pattern).map_err(|e| DiffError::InvalidMaskPattern {
            pattern: mask_token.pattern.clone(),
            detail: e.to_string(),
        })?;
        let placeholder = placeholder_for(&mask_token.token_name);
        let unresolved = unresolved_token_placeholder(&mask_token.token_name);

        let already_placeholder = before.contains(&placeholder) || after.contains(&placeholder);

        if already_placeholder {
            *before = re.replace_all(before, placeholder.as_str()).into_owned();
            *after = re.replace_all(after, placeholder.as_str()).into_owned();
        } else {
            *before = re
                .replace_all(before, |caps: &regex::Captures| format!("{unresolved}{}", &caps[0]))
                .into_owned();
            *after = re
                .replace_all(after, |caps: &regex::Captures| format!("{unresolved}{}", &caps[0]))
                .into_owned();
        }

        redactions.push(Redaction {
            token_name: mask_token.token_name.clone(),
            placeholder: if already_placeholder { placeholder } else { unresolved },
            expected: already_placeholder,
        });
    }

    Ok(redactions)
}

/// Deterministic `xxh3` hash of the ordered `(token_name, pattern)` pairs,
/// used as the `redactor_fingerprint` component of a `DiffCacheKey`.
pub fn redactor_fingerprint(mask_tokens: &[MaskToken]) -> String {
    let mut ordered: Vec<(&str, &str)> = mask_tokens
        .iter()
        .map(|t| (t.token_name.as_str(), t.pattern.as_str()))
        .collect();
    ordered.sort_unstable();

    let mut buf = Vec::new();
    for (token_name, pattern) in ordered {
        buf.extend_from_slice(token_name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(pattern.as_bytes());
        buf.push(b'\n');
    }

    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(name: &str, pattern: &str) -> MaskToken {
        MaskToken {
            token_name: name.to_string(),
            pattern: pattern.to_string(),
        }
    }

    #[test]
    fn unresolved_mask_prefixes_the_raw_value_instead_of_erasing_it() {
        let mut before = "Server=prod-db-01.internal;".to_string();
        let mut after = "Server=prod-db-02.internal;".to_string();
        let redactions = apply_masks(&mut before, &mut after, &[token("database_server", r"prod-db-\d+\.internal")]).unwrap();

        assert_eq!(before, "Server=[[TOKEN:database_server]]prod-db-01.internal;");
        assert_eq!(after, "Server=[[TOKEN:database_server]]prod-db-02.internal;");
        assert_eq!(redactions.len(), 1);
        assert_eq!(redactions[0].placeholder, "[[TOKEN:database_server]]");
        assert!(!redactions[0].expected);
    }

    #[test]
    fn marks_expected_when_placeholder_already_present() {
        let mut before = "Server={{ database_server }};".to_string();
        let mut after = "Server=prod-db-02.internal;".to_string();
        let redactions = apply_masks(&mut before, &mut after, &[token("database_server", r"prod-db-\d+\.internal|\{\{ database_server \}\}")]).unwrap();
        assert!(redactions[0].expected);
    }

    #[test]
    fn unmatched_token_emits_unresolved_fallback() {
        let mut before = "nothing to see here".to_string();
        let mut after = "still nothing".to_string();
        let redactions = apply_masks(&mut before, &mut after, &[token("database_server", r"prod-db-\d+\.internal")]).unwrap();
        assert_eq!(redactions[0].placeholder, "[[TOKEN:database_server]]");
        assert!(!redactions[0].expected);
    }

    #[test]
    fn fingerprint_is_order_independent() {
        let a = [token("x", "1"), token("y", "2")];
        let b = [token("y", "2"), token("x", "1")];
        assert_eq!(redactor_fingerprint(&a), redactor_fingerprint(&b));
    }

    #[test]
    fn fingerprint_changes_with_pattern() {
        let a = [token("x", "1")];
        let b = [token("x", "2")];
        assert_ne!(redactor_fingerprint(&a), redactor_fingerprint(&b));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut before = String::new();
        let mut after = String::new();
        let result = apply_masks(&mut before, &mut after, &[token("x", "[")]);
        assert!(result.is_err());
    }
}
