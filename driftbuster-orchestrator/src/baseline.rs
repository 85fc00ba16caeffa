//! Baseline host selection.

use std::collections::BTreeMap;

/// Pick the host whose canonical content is most common across hosts,
/// breaking ties by minimal total edit distance to every other host's
/// content. The caller may force a specific host via `override_host`.
///
/// Hosts whose detected format is `unknown-text-or-binary` must already
/// be excluded from `contents` by the caller — such matches have no
/// comparable canonical text and are excluded from baseline *content*
/// voting, though they still count toward `per_host_presence`.
pub fn choose_baseline(contents: &BTreeMap<String, String>, override_host: Option<&str>) -> Option<String> {
    if let Some(host) = override_host {
        if contents.contains_key(host) {
            return Some(host.to_string());
        }
    }
    if contents.is_empty() {
        return None;
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for content in contents.values() {
        *counts.entry(content.as_str()).or_insert(0) += 1;
    }
    let max_count = *counts.values().max().expect("contents is non-empty");
    let leading: Vec<&str> = counts
        .iter()
        .filter(|&(_, &count)| count == max_count)
        .map(|(&content, _)| content)
        .collect();

    if leading.len() == 1 {
        let content = leading[0];
        return contents
            .iter()
            .filter(|&(_, v)| v.as_str() == content)
            .map(|(host, _)| host.clone())
            .min();
    }

    contents
        .iter()
        .map(|(host, content)| {
            let total_distance: usize = contents.values().map(|other| strsim::levenshtein(content, other)).sum();
            (total_distance, host.clone())
        })
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
        .map(|(_, host)| host)
}
