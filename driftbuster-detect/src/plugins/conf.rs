//! Conf format plugin (catalog priority 70) — Unix-style
//! directive configuration (nginx, sshd, and similar `directive value`
//! syntaxes), distinguished from INI-lineage by the absence of `=`/`:`
//! separators and the common use of braces for nested blocks.

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;

use super::{extension_lower, MatchBuilder};

pub struct ConfPlugin;

impl Plugin for ConfPlugin {
    fn name(&self) -> &'static str {
        "conf"
    }

    fn priority(&self) -> i32 {
        70
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let has_conf_extension = extension_lower(path).as_deref() == Some("conf");

        let mut directive_lines = 0u32;
        let mut assignment_lines = 0u32;
        let mut non_blank = 0u32;
        let mut brace_blocks = 0u32;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            non_blank += 1;
            if line.ends_with('{') {
                brace_blocks += 1;
                continue;
            }
            if line == "}" {
                continue;
            }
            if line.contains('=') {
                assignment_lines += 1;
                continue;
            }
            let mut words = line.split_whitespace();
            if words.next().is_some() && words.next().is_some() {
                directive_lines += 1;
            }
        }

        if non_blank == 0 {
            return None;
        }
        // Distinguish from INI: a `.conf` file dominated by `directive
        // value;` lines rather than `key=value` assignment lines.
        let directive_share = directive_lines as f32 / non_blank as f32;
        if !has_conf_extension && directive_share < 0.4 {
            return None;
        }
        if directive_lines == 0 && brace_blocks == 0 && !has_conf_extension {
            return None;
        }

        let mut builder = MatchBuilder::new("conf").reason("majority of lines are directive-style");
        if has_conf_extension {
            builder = builder.reason("file extension is .conf").boost(0.15);
        }
        if brace_blocks > 0 {
            builder = builder.reason("contains brace-delimited blocks").boost(0.15);
        }
        builder = builder
            .boost(0.1)
            .meta("directive_lines", directive_lines)
            .meta("brace_blocks", brace_blocks);

        let variant = if brace_blocks > 0 {
            "block-directive-conf"
        } else {
            "flat-directive-conf"
        };

        Some(builder.variant(variant).build(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_nginx_style_blocks() {
        let plugin = ConfPlugin;
        let text = "server {\n    listen 80;\n    server_name example.com;\n}\n";
        let m = plugin
            .detect(&PathBuf::from("nginx.conf"), text.as_bytes(), Some(text))
            .unwrap();
        assert_eq!(m.variant.as_deref(), Some("block-directive-conf"));
    }

    #[test]
    fn declines_key_value_assignment_file() {
        let plugin = ConfPlugin;
        let text = "host=localhost\nport=8080\n";
        assert!(plugin
            .detect(&PathBuf::from("app.properties"), text.as_bytes(), Some(text))
            .is_none());
    }
}
