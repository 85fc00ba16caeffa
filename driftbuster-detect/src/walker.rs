//! Single-threaded directory walker with glob filtering and symlink-cycle
//! protection. The detector orchestrator is single-threaded per scan, so
//! this uses `ignore::WalkBuilder::build()` rather than
//! `build_parallel()`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use driftbuster_core::CancellationToken;

/// Walk `root`, yielding regular files in deterministic lexicographic
/// path order unless the caller specifies a glob-derived order, honouring
/// `.gitignore`, `.driftignore`, an optional glob filter, and
/// symlink-cycle protection via a visited-inode set owned by this call.
pub fn walk_files(
    root: &Path,
    glob: Option<&glob::Pattern>,
    follow_symlinks: bool,
    extra_ignore: &[String],
    cancellation: &CancellationToken,
) -> Vec<PathBuf> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .add_custom_ignore_filename(".driftignore")
        .follow_links(follow_symlinks);

    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    for pattern in extra_ignore {
        let _ = overrides.add(&format!("!{pattern}"));
    }
    if let Ok(built) = overrides.build() {
        builder.overrides(built);
    }

    let mut visited_inodes: HashSet<u64> = HashSet::new();
    let mut files = Vec::new();

    for entry in builder.build() {
        if cancellation.is_cancelled() {
            break;
        }
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let path = entry.path().to_path_buf();

        if let Some(pattern) = glob {
            if !pattern.matches_path(&path) {
                continue;
            }
        }

        if follow_symlinks {
            if let Ok(metadata) = entry.metadata() {
                if !visited_inodes.insert(inode_of(&metadata)) {
                    // Already visited this inode via another path — a
                    // symlink cycle. Skip it.
                    continue;
                }
            }
        }

        files.push(path);
    }

    files.sort();
    files
}

#[cfg(unix)]
fn inode_of(metadata: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
fn inode_of(metadata: &std::fs::Metadata) -> u64 {
    // Windows has no stable inode via std; fall back to a (len, modified)
    // composite, which is sufficient to detect the common cycle case of a
    // symlink pointing back at an ancestor directory's unchanged file.
    use std::hash::{Hash, Hasher};
    let mut hasher = rustc_hash::FxHasher::default();
    metadata.len().hash(&mut hasher);
    if let Ok(modified) = metadata.modified() {
        if let Ok(dur) = modified.duration_since(std::time::UNIX_EPOCH) {
            dur.as_nanos().hash(&mut hasher);
        }
    }
    std::hash::Hasher::finish(&hasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_returns_sorted_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let token = CancellationToken::new();
        let files = walk_files(dir.path(), None, false, &[], &token);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn walk_respects_glob_filter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.yaml"), "a: 1").unwrap();

        let pattern = glob::Pattern::new("*.json").unwrap();
        let token = CancellationToken::new();
        let files = walk_files(dir.path(), Some(&pattern), false, &[], &token);
        assert_eq!(files.len(), 1);
        assert!(files[0].to_string_lossy().ends_with("a.json"));
    }

    #[test]
    fn empty_root_produces_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let token = CancellationToken::new();
        let files = walk_files(dir.path(), None, false, &[], &token);
        assert!(files.is_empty());
    }
}
