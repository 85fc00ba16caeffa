//! Dockerfile format plugin (catalog priority 10).

use std::path::Path;
use std::sync::OnceLock;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;
use regex::Regex;

use super::{file_name, MatchBuilder};

const INSTRUCTIONS: &[&str] = &[
    "FROM", "RUN", "CMD", "LABEL", "EXPOSE", "ENV", "ADD", "COPY", "ENTRYPOINT", "VOLUME", "USER",
    "WORKDIR", "ARG", "ONBUILD", "STOPSIGNAL", "HEALTHCHECK", "SHELL",
];

fn filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^Dockerfile(\..+)?$|^.*\.dockerfile$").unwrap())
}

pub struct DockerfilePlugin;

impl Plugin for DockerfilePlugin {
    fn name(&self) -> &'static str {
        "dockerfile"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let name = file_name(path);
        let name_matches = filename_re().is_match(&name);

        let mut has_from = false;
        let mut instruction_lines = 0u32;
        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let first_word = line.split_whitespace().next().unwrap_or("").to_uppercase();
            if INSTRUCTIONS.contains(&first_word.as_str()) {
                instruction_lines += 1;
                if first_word == "FROM" {
                    has_from = true;
                }
            }
        }

        if !name_matches && !has_from {
            return None;
        }
        if instruction_lines == 0 {
            return None;
        }

        let mut builder = MatchBuilder::new("dockerfile");
        if name_matches {
            builder = builder.reason("filename matches Dockerfile naming convention").boost(0.2);
        }
        if has_from {
            builder = builder.reason("contains a FROM instruction").boost(0.2);
        }
        builder = builder
            .reason("contains recognised Dockerfile instructions")
            .meta("instruction_lines", instruction_lines);

        let variant = if has_from { "standard-dockerfile" } else { "dockerfile-fragment" };

        Some(builder.variant(variant).build(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_standard_dockerfile() {
        let plugin = DockerfilePlugin;
        let text = "FROM rust:1.80\nRUN cargo build --release\nCMD [\"./app\"]\n";
        let m = plugin
            .detect(&PathBuf::from("Dockerfile"), text.as_bytes(), Some(text))
            .unwrap();
        assert_eq!(m.variant.as_deref(), Some("standard-dockerfile"));
    }

    #[test]
    fn detects_multistage_naming() {
        let plugin = DockerfilePlugin;
        let text = "FROM node:20 AS build\nRUN npm ci\n";
        let m = plugin
            .detect(&PathBuf::from("Dockerfile.build"), text.as_bytes(), Some(text))
            .unwrap();
        assert!(m.is_positive());
    }

    #[test]
    fn declines_unrelated_text() {
        let plugin = DockerfilePlugin;
        let text = "hello world\nnothing here\n";
        assert!(plugin
            .detect(&PathBuf::from("readme.txt"), text.as_bytes(), Some(text))
            .is_none());
    }
}
