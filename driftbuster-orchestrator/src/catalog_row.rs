//! Build one `CatalogRow` per logical config_id.

use std::collections::BTreeMap;

use driftbuster_catalog::Catalog;
use driftbuster_core::types::server::{CatalogRow, Presence, Severity};

/// Max of the catalog's `default_severity` across every format_id
/// observed for this config_id. Unknown format ids (e.g.
/// `unknown-text-or-binary`, `binary-dat`) are not in the catalog and
/// contribute `Severity::None`.
pub fn severity_for_formats<'a>(catalog: &Catalog, format_ids: impl Iterator<Item = &'a str>) -> Severity {
    format_ids
        .map(|id| {
            catalog
                .entry_by_format_id(id)
                .map(|e| e.default_severity)
                .unwrap_or(Severity::None)
        })
        .max()
        .unwrap_or(Severity::None)
}

/// Majority vote across every format_id observed for this config_id,
/// breaking ties by lexicographically smallest format_id for
/// determinism (see DESIGN.md for why this tie-break was chosen).
pub fn majority_format_id<'a>(format_ids: impl Iterator<Item = &'a str>) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in format_ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(id, _)| id.to_string())
        .unwrap_or_else(|| "unknown-text-or-binary".to_string())
}

/// Assemble one `CatalogRow`. `per_host_presence` and `format_ids` are
/// computed by the engine from the per-host aggregation; this function
/// only applies the catalog-derived and majority-vote rules.
pub fn build_catalog_row(
    config_id: String,
    per_host_presence: BTreeMap<String, Presence>,
    format_ids: &[String],
    drift_count: usize,
    last_updated: i64,
    catalog: &Catalog,
) -> CatalogRow {
    CatalogRow {
        config_id,
        per_host_presence,
        drift_count,
        severity: severity_for_formats(catalog, format_ids.iter().map(String::as_str)),
        format_id: majority_format_id(format_ids.iter().map(String::as_str)),
        last_updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_takes_the_maximum_across_formats() {
        let catalog = Catalog::builtin().unwrap();
        // toml = low, hcl = high
        let severity = severity_for_formats(&catalog, ["toml", "hcl"].into_iter());
        assert_eq!(severity, Severity::High);
    }

    #[test]
    fn unknown_format_contributes_no_severity() {
        let catalog = Catalog::builtin().unwrap();
        let severity = severity_for_formats(&catalog, ["unknown-text-or-binary"].into_iter());
        assert_eq!(severity, Severity::None);
    }

    #[test]
    fn majority_format_id_picks_the_most_common() {
        let formats = vec!["json".to_string(), "json".to_string(), "yaml".to_string()];
        assert_eq!(majority_format_id(formats.iter().map(String::as_str)), "json");
    }

    #[test]
    fn majority_format_id_breaks_ties_lexicographically() {
        let formats = vec!["yaml".to_string(), "json".to_string()];
        assert_eq!(majority_format_id(formats.iter().map(String::as_str)), "json");
    }
}
