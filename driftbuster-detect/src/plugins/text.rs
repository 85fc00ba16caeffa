//! Plain text fallback plugin (catalog priority 999).
//!
//! Runs last; claims any decodable text that no other plugin wanted,
//! distinct from the orchestrator's `unknown-text-or-binary` fallback
//! (which fires only when *no* plugin, including this one, matches —
//! i.e. undecodable content).

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;

use super::MatchBuilder;

pub struct TextPlugin;

impl Plugin for TextPlugin {
    fn name(&self) -> &'static str {
        "text"
    }

    fn priority(&self) -> i32 {
        999
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let builder = MatchBuilder::new("text")
            .reason("decodable text content with no recognised structure")
            .meta("line_count", text.lines().count() as u64);

        Some(builder.variant("plain-text").build(path))
    }
}
