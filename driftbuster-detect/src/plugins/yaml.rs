//! YAML format plugin (catalog priority 20).

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;

use super::{extension_lower, MatchBuilder};

pub struct YamlPlugin;

impl Plugin for YamlPlugin {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let extension = extension_lower(path);
        let has_yaml_extension = matches!(extension.as_deref(), Some("yaml") | Some("yml"));

        // JSON is a YAML subset; don't let a plain JSON document masquerade
        // as a YAML match purely because `serde_yaml` parses it. Require an
        // extension hit or at least one YAML-ish structural cue.
        let looks_structurally_yaml = text.lines().any(|l| {
            let t = l.trim_start();
            t.starts_with("- ") || (t.contains(':') && !t.trim_end().ends_with('{'))
        });
        if !has_yaml_extension && !looks_structurally_yaml {
            return None;
        }

        let value: serde_yaml::Value = serde_yaml::from_str(text).ok()?;

        let mut builder = MatchBuilder::new("yaml").reason("parsed as valid YAML");
        if has_yaml_extension {
            builder = builder.reason("file extension matches .yaml/.yml").boost(0.2);
        }

        let top_level_type = match &value {
            serde_yaml::Value::Mapping(_) => "object",
            serde_yaml::Value::Sequence(_) => "array",
            _ => "scalar",
        };
        builder = builder.meta("top_level_type", top_level_type);

        if let serde_yaml::Value::Mapping(map) = &value {
            let has_anchors_alias_markers = text.contains('&') || text.contains('*');
            if map.len() > 1 {
                builder = builder.boost(0.1);
            }
            let variant = if has_anchors_alias_markers {
                "anchored-mapping-yaml"
            } else {
                "generic-mapping-yaml"
            };
            return Some(builder.variant(variant).build(path));
        }

        Some(builder.variant("generic-yaml").build(path))
    }
}
