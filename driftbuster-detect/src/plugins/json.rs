//! JSON format plugin (catalog priority 30).

use std::path::Path;

use driftbuster_core::constants::STRUCTURAL_ANALYSIS_WINDOW;
use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;
use serde_json::Value;

use super::{extension_lower, MatchBuilder};

pub struct JsonPlugin;

impl Plugin for JsonPlugin {
    fn name(&self) -> &'static str {
        "json"
    }

    fn priority(&self) -> i32 {
        30
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let mut builder = MatchBuilder::new("json");
        let mut extension_hit = false;

        if extension_lower(path).as_deref() == Some("json") {
            builder = builder.reason("file extension is .json").boost(0.2);
            extension_hit = true;
        }

        let window = &text.as_bytes()[..text.len().min(STRUCTURAL_ANALYSIS_WINDOW)];
        let window_text = std::str::from_utf8(window).ok()?;
        let parsed: Value = serde_json::from_str(window_text)
            .or_else(|_| serde_json::from_str(text))
            .ok()?;

        builder = builder.reason("parsed as valid JSON").boost(0.3);

        let variant = match &parsed {
            Value::Object(map) => {
                let keys: Vec<String> = map.keys().cloned().collect();
                builder = builder
                    .meta("top_level_type", "object")
                    .meta("top_level_keys", keys.clone());
                if keys.iter().any(|k| k.eq_ignore_ascii_case("logging")) {
                    "structured-settings-json"
                } else {
                    "generic-object-json"
                }
            }
            Value::Array(_) => {
                builder = builder.meta("top_level_type", "array");
                "generic-array-json"
            }
            _ => {
                builder = builder.meta("top_level_type", "scalar");
                "generic-scalar-json"
            }
        };

        if !extension_hit {
            builder = builder.reason("content parses as JSON despite extension");
        }

        Some(builder.variant(variant).build(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_structured_settings_variant() {
        let plugin = JsonPlugin;
        let text = r#"{"Logging":{"Level":"Info"}}"#;
        let m = plugin
            .detect(&PathBuf::from("a/appsettings.json"), text.as_bytes(), Some(text))
            .unwrap();
        assert_eq!(m.format_id.as_deref(), Some("json"));
        assert_eq!(m.variant.as_deref(), Some("structured-settings-json"));
        assert!(m.confidence > 0.5);
    }

    #[test]
    fn declines_non_json_text() {
        let plugin = JsonPlugin;
        let text = "not json at all";
        let m = plugin.detect(&PathBuf::from("a.txt"), text.as_bytes(), Some(text));
        assert!(m.is_none());
    }

    #[test]
    fn declines_without_decoded_text() {
        let plugin = JsonPlugin;
        let m = plugin.detect(&PathBuf::from("a.json"), b"\x00\x01", None);
        assert!(m.is_none());
    }
}
