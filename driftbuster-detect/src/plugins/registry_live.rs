//! RegistryLive format plugin (catalog priority 15) — Windows registry
//! export files. Uses the same key=value line scanning the INI plugin
//! uses, since `.reg` syntax is a structured superset of Windows INI
//! (bracketed key path headers, `"name"=value` pairs).

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;

use super::{extension_lower, MatchBuilder};

const HEADER_V4: &str = "REGEDIT4";
const HEADER_V5_PREFIX: &str = "Windows Registry Editor Version";

pub struct RegistryLivePlugin;

impl Plugin for RegistryLivePlugin {
    fn name(&self) -> &'static str {
        "registry-live"
    }

    fn priority(&self) -> i32 {
        15
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let first_line = text.lines().next()?.trim();

        let version = if first_line == HEADER_V4 {
            Some("4")
        } else if first_line.starts_with(HEADER_V5_PREFIX) {
            Some("5")
        } else {
            None
        };

        let has_reg_extension = extension_lower(path).as_deref() == Some("reg");
        if version.is_none() && !has_reg_extension {
            return None;
        }

        let key_path_lines = text
            .lines()
            .filter(|l| l.trim().starts_with('[') && l.trim().ends_with(']'))
            .count();
        let value_lines = text
            .lines()
            .filter(|l| {
                let t = l.trim();
                t.starts_with('"') && t.contains('=')
            })
            .count();

        if version.is_none() && key_path_lines == 0 {
            return None;
        }

        let mut builder = MatchBuilder::new("registry-live");
        if let Some(v) = version {
            builder = builder
                .reason("recognised registry export header")
                .boost(0.3)
                .meta("registry_format_version", v);
        }
        if has_reg_extension {
            builder = builder.reason("file extension is .reg").boost(0.1);
        }
        if key_path_lines > 0 {
            builder = builder
                .reason("contains bracketed registry key paths")
                .boost(0.1)
                .meta("key_path_lines", key_path_lines as u64)
                .meta("value_lines", value_lines as u64);
        }

        Some(builder.variant("windows-registry-export").build(path))
    }
}
