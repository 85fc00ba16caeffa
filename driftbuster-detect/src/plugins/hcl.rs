//! HCL format plugin (catalog priority 50).
//!
//! HCL has no single canonical Rust parser in wide use across this stack,
//! so detection stays structural: block-header shape plus a keyword
//! vocabulary, bounded to the sampled text rather than a full grammar.

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;
use regex::Regex;
use std::sync::OnceLock;

use super::{extension_lower, MatchBuilder};

const TOP_LEVEL_BLOCKS: &[&str] = &[
    "resource", "provider", "variable", "output", "module", "terraform", "data", "locals",
];

fn block_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*([a-zA-Z_][a-zA-Z0-9_]*)\s+(?:"[^"]*"\s*)*\{"#).unwrap()
    })
}

pub struct HclPlugin;

impl Plugin for HclPlugin {
    fn name(&self) -> &'static str {
        "hcl"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let extension = extension_lower(path);
        let has_hcl_extension = matches!(
            extension.as_deref(),
            Some("hcl") | Some("tf") | Some("tfvars")
        );

        let mut matched_blocks: Vec<String> = block_header_re()
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .filter(|kw| TOP_LEVEL_BLOCKS.contains(&kw.as_str()))
            .collect();
        matched_blocks.sort();
        matched_blocks.dedup();

        if matched_blocks.is_empty() {
            return None;
        }

        let mut builder = MatchBuilder::new("hcl")
            .reason("contains top-level HCL block headers")
            .boost(0.2)
            .meta("top_level_blocks", matched_blocks.clone());
        if has_hcl_extension {
            builder = builder.reason("file extension matches .hcl/.tf/.tfvars").boost(0.2);
        }

        let variant = if matched_blocks.iter().any(|b| b == "terraform" || b == "resource") {
            "terraform-hcl"
        } else {
            "generic-hcl"
        };

        Some(builder.variant(variant).build(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_terraform_resource_block() {
        let plugin = HclPlugin;
        let text = "resource \"aws_instance\" \"web\" {\n  ami = \"abc\"\n}\n";
        let m = plugin
            .detect(&PathBuf::from("main.tf"), text.as_bytes(), Some(text))
            .unwrap();
        assert_eq!(m.variant.as_deref(), Some("terraform-hcl"));
    }

    #[test]
    fn declines_plain_text() {
        let plugin = HclPlugin;
        let text = "hello there, nothing structural here";
        assert!(plugin
            .detect(&PathBuf::from("notes.txt"), text.as_bytes(), Some(text))
            .is_none());
    }
}
