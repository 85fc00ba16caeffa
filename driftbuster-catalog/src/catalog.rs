//! The `Catalog` — declares known formats, ordered by priority. Built-in
//! data is embedded at compile time via `include_str!` and parsed once.

use serde::Deserialize;

use driftbuster_core::types::catalog::CatalogEntry;

use crate::errors::CatalogError;

const BUILTIN_CATALOG_TOML: &str = include_str!("catalog.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    schema_version: String,
    #[serde(rename = "entry")]
    entries: Vec<CatalogEntry>,
}

/// The process-wide, immutable-after-load description of known formats.
#[derive(Debug, Clone)]
pub struct Catalog {
    schema_version: String,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load the built-in catalog embedded in this binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG_TOML)
    }

    /// Parse a catalog from a TOML document, validating `format_id`
    /// uniqueness.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, CatalogError> {
        let parsed: CatalogFile =
            toml::from_str(toml_str).map_err(|e| CatalogError::MalformedCatalog {
                message: e.to_string(),
            })?;

        let mut seen = std::collections::HashSet::new();
        for entry in &parsed.entries {
            if !seen.insert(entry.format_id.clone()) {
                return Err(CatalogError::DuplicateFormatId {
                    format_id: entry.format_id.clone(),
                });
            }
        }

        let mut entries = parsed.entries;
        entries.sort_by_key(|e| e.priority);

        Ok(Self {
            schema_version: parsed.schema_version,
            entries,
        })
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Entries in ascending priority order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry_by_format_id(&self, format_id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.format_id == format_id)
    }

    /// Entries whose `extensions` set contains the given extension
    /// (case-insensitive, no leading dot).
    pub fn entries_for_extension(&self, extension: &str) -> Vec<&CatalogEntry> {
        let needle = extension.to_ascii_lowercase();
        self.entries
            .iter()
            .filter(|e| e.extensions.iter().any(|ext| ext.eq_ignore_ascii_case(&needle)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads_and_is_sorted() {
        let catalog = Catalog::builtin().expect("builtin catalog parses");
        assert!(!catalog.entries().is_empty());
        let priorities: Vec<_> = catalog.entries().iter().map(|e| e.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn builtin_catalog_has_unique_format_ids() {
        let catalog = Catalog::builtin().unwrap();
        let mut seen = std::collections::HashSet::new();
        for entry in catalog.entries() {
            assert!(seen.insert(entry.format_id.clone()), "duplicate format_id");
        }
    }

    #[test]
    fn duplicate_format_id_is_rejected() {
        let toml_str = r#"
            schema_version = "1.0"
            [[entry]]
            name = "A"
            format_id = "dup"
            priority = 1
            [[entry]]
            name = "B"
            format_id = "dup"
            priority = 2
        "#;
        let result = Catalog::from_toml_str(toml_str);
        assert!(matches!(result, Err(CatalogError::DuplicateFormatId { .. })));
    }

    #[test]
    fn entries_for_extension_is_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        let json_upper = catalog.entries_for_extension("JSON");
        let json_lower = catalog.entries_for_extension("json");
        assert_eq!(json_upper.len(), json_lower.len());
        assert!(!json_lower.is_empty());
    }
}
