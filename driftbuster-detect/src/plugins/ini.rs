//! INI-lineage format plugin (catalog priority 60).
//!
//! One plugin covers classic INI, Java `.properties`, and Windows
//! `key=value` variants rather than treating them as separate detectors;
//! the catalog collapses them into one `format_id` with distinct
//! `variant`s. State machine: `line-probe →
//! section-detect → separator-detect → variant-select`.

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;

use super::{extension_lower, MatchBuilder};

#[derive(Default)]
struct LineCounts {
    sections: u32,
    equals_pairs: u32,
    colon_pairs: u32,
    comment_hash: u32,
    comment_bang: u32,
    non_blank: u32,
}

pub struct IniPlugin;

impl Plugin for IniPlugin {
    fn name(&self) -> &'static str {
        "ini"
    }

    fn priority(&self) -> i32 {
        60
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let counts = probe_lines(text);

        if counts.non_blank == 0 {
            return None;
        }
        let pair_lines = counts.equals_pairs + counts.colon_pairs;
        if pair_lines == 0 {
            return None;
        }
        // Require the overwhelming majority of non-comment, non-blank
        // content to look like key/value or section lines, so a prose
        // file with one stray "a: b" doesn't get claimed.
        let structural_lines = pair_lines + counts.sections;
        if (structural_lines as f32) < 0.6 * counts.non_blank as f32 {
            return None;
        }

        let extension = extension_lower(path);
        let mut builder = MatchBuilder::new("ini").reason("majority of lines are key/value or section lines");

        if counts.sections > 0 {
            builder = builder.reason("contains [section] headers").boost(0.15);
        }

        let variant = select_variant(extension.as_deref(), &counts);
        builder = builder
            .boost(0.1)
            .meta("equals_pairs", counts.equals_pairs)
            .meta("colon_pairs", counts.colon_pairs)
            .meta("sections", counts.sections);

        Some(builder.variant(variant).build(path))
    }
}

fn probe_lines(text: &str) -> LineCounts {
    let mut counts = LineCounts::default();
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        counts.non_blank += 1;
        if line.starts_with('#') {
            counts.comment_hash += 1;
            continue;
        }
        if line.starts_with('!') {
            counts.comment_bang += 1;
            continue;
        }
        if line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            counts.sections += 1;
            continue;
        }
        if let Some(eq) = line.find('=') {
            if eq > 0 {
                counts.equals_pairs += 1;
                continue;
            }
        }
        if let Some(colon) = line.find(':') {
            if colon > 0 {
                counts.colon_pairs += 1;
            }
        }
    }
    counts
}

fn select_variant(extension: Option<&str>, counts: &LineCounts) -> &'static str {
    match extension {
        Some("properties") => "java-properties",
        Some("reg") => "ini-windows",
        _ if counts.comment_bang > 0 && counts.sections == 0 => "java-properties",
        _ if counts.sections > 0 => "ini-classic",
        _ => "ini-windows",
    }
}
