//! TOML format plugin (catalog priority 25).

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;

use super::{extension_lower, MatchBuilder};

pub struct TomlPlugin;

impl Plugin for TomlPlugin {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn priority(&self) -> i32 {
        25
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let value: toml::Value = toml::from_str(text).ok()?;

        let mut builder = MatchBuilder::new("toml").reason("parsed as valid TOML");

        if extension_lower(path).as_deref() == Some("toml") {
            builder = builder.reason("file extension is .toml").boost(0.2);
        }

        let top_level_keys: Vec<String> = match &value {
            toml::Value::Table(table) => table.keys().cloned().collect(),
            _ => Vec::new(),
        };
        if !top_level_keys.is_empty() {
            builder = builder.boost(0.1).meta("top_level_keys", top_level_keys);
        }

        let variant = if extension_lower(path).as_deref() == Some("toml")
            && path
                .file_name()
                .is_some_and(|n| n.to_string_lossy() == "Cargo.toml")
        {
            "cargo-manifest-toml"
        } else {
            "generic-toml"
        };

        Some(builder.variant(variant).build(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_generic_toml() {
        let plugin = TomlPlugin;
        let text = "[server]\nhost = \"localhost\"\n";
        let m = plugin
            .detect(&PathBuf::from("config.toml"), text.as_bytes(), Some(text))
            .unwrap();
        assert_eq!(m.format_id.as_deref(), Some("toml"));
        assert_eq!(m.variant.as_deref(), Some("generic-toml"));
    }

    #[test]
    fn detects_cargo_manifest_variant() {
        let plugin = TomlPlugin;
        let text = "[package]\nname = \"x\"\n";
        let m = plugin
            .detect(&PathBuf::from("Cargo.toml"), text.as_bytes(), Some(text))
            .unwrap();
        assert_eq!(m.variant.as_deref(), Some("cargo-manifest-toml"));
    }

    #[test]
    fn declines_non_toml_text() {
        let plugin = TomlPlugin;
        let text = "{ not: toml }}}";
        assert!(plugin
            .detect(&PathBuf::from("a.toml"), text.as_bytes(), Some(text))
            .is_none());
    }
}
