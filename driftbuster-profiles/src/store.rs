//! `ProfileStore` — immutable profile records mutated via copy-on-write.
//!
//! A single `RwLock`-guarded map, mutators receive a clone, and a
//! validated clone replaces the original atomically. Profile counts are
//! small enough that a full clone per write is the simplest correct
//! option, rather than reaching for a persistent-data-structure crate.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use driftbuster_core::types::profile::{ConfigurationProfile, ProfileConfig};

use crate::errors::ProfileError;

/// Ordered, deterministic snapshot of one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub tags: BTreeSet<String>,
    pub config_identifiers: Vec<String>,
}

/// Result of comparing two `summary()` snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

/// Tag-activated set of expected-configuration profiles.
pub struct ProfileStore {
    profiles: RwLock<BTreeMap<String, ConfigurationProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a new profile. Fails if the profile name already exists,
    /// or if any of its config identifiers collide with a config
    /// identifier anywhere else in the store — identifiers are globally
    /// unique within a store.
    pub fn register_profile(&self, profile: ConfigurationProfile) -> Result<(), ProfileError> {
        let mut guard = self.profiles.write();
        if guard.contains_key(&profile.name) {
            return Err(ProfileError::DuplicateName { name: profile.name });
        }
        check_identifiers_unique(&guard, None, &profile.configs)?;
        guard.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Apply `mutator` to a clone of the named profile; only on success
    /// does the mutated clone replace the original, atomically.
    pub fn update_profile<F>(&self, name: &str, mutator: F) -> Result<(), ProfileError>
    where
        F: FnOnce(&mut ConfigurationProfile),
    {
        let mut guard = self.profiles.write();
        let original = guard
            .get(name)
            .cloned()
            .ok_or_else(|| ProfileError::UnknownProfile {
                name: name.to_string(),
            })?;

        let mut mutated = original;
        mutator(&mut mutated);

        check_identifiers_unique(&guard, Some(name), &mutated.configs)?;
        guard.insert(name.to_string(), mutated);
        Ok(())
    }

    pub fn remove_profile(&self, name: &str) -> Result<ConfigurationProfile, ProfileError> {
        let mut guard = self.profiles.write();
        guard
            .remove(name)
            .ok_or_else(|| ProfileError::UnknownProfile {
                name: name.to_string(),
            })
    }

    /// Remove a single config from its owning profile.
    pub fn remove_config(&self, identifier: &str) -> Result<ProfileConfig, ProfileError> {
        let mut guard = self.profiles.write();
        for profile in guard.values_mut() {
            if let Some(pos) = profile.configs.iter().position(|c| c.identifier == identifier) {
                return Ok(profile.configs.remove(pos));
            }
        }
        Err(ProfileError::UnknownConfig {
            identifier: identifier.to_string(),
        })
    }

    pub fn find_config(&self, identifier: &str) -> Option<(ConfigurationProfile, ProfileConfig)> {
        let guard = self.profiles.read();
        for profile in guard.values() {
            if let Some(config) = profile.configs.iter().find(|c| c.identifier == identifier) {
                return Some((profile.clone(), config.clone()));
            }
        }
        None
    }

    /// Profiles whose activation tags are a subset of `tags`, ordered by
    /// name.
    pub fn applicable_profiles(&self, tags: &BTreeSet<String>) -> Vec<ConfigurationProfile> {
        let guard = self.profiles.read();
        guard
            .values()
            .filter(|p| p.applies_under(tags))
            .cloned()
            .collect()
    }

    /// `(Profile, ProfileConfig)` pairs whose path matches
    /// `relative_path`, either exactly or via `path_glob`. `relative_path`
    /// is normalised to POSIX separators before comparison.
    pub fn matching_configs(
        &self,
        tags: &BTreeSet<String>,
        relative_path: &str,
    ) -> Vec<(ConfigurationProfile, ProfileConfig)> {
        let normalised = normalise_path(relative_path);
        let guard = self.profiles.read();
        let mut out = Vec::new();
        for profile in guard.values() {
            if !profile.applies_under(tags) {
                continue;
            }
            for config in &profile.configs {
                if config_matches(config, &normalised) {
                    out.push((profile.clone(), config.clone()));
                }
            }
        }
        out
    }

    /// Deterministic snapshot sequence, ordered by profile name.
    pub fn summary(&self) -> Vec<ProfileSummary> {
        let guard = self.profiles.read();
        guard
            .values()
            .map(|p| ProfileSummary {
                name: p.name.clone(),
                tags: p.tags.clone(),
                config_identifiers: p.configs.iter().map(|c| c.identifier.clone()).collect(),
            })
            .collect()
    }

    /// Compare two `summary()` snapshots, reporting profile names added,
    /// removed, or with a different config set, all sorted for
    /// determinism.
    pub fn diff_summary_snapshots(a: &[ProfileSummary], b: &[ProfileSummary]) -> SummaryDiff {
        let a_map: BTreeMap<&str, &ProfileSummary> = a.iter().map(|s| (s.name.as_str(), s)).collect();
        let b_map: BTreeMap<&str, &ProfileSummary> = b.iter().map(|s| (s.name.as_str(), s)).collect();

        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut changed = Vec::new();

        for name in b_map.keys() {
            if !a_map.contains_key(name) {
                added.push(name.to_string());
            }
        }
        for (name, a_summary) in &a_map {
            match b_map.get(name) {
                None => removed.push(name.to_string()),
                Some(b_summary) => {
                    if a_summary.config_identifiers != b_summary.config_identifiers
                        || a_summary.tags != b_summary.tags
                    {
                        changed.push(name.to_string());
                    }
                }
            }
        }

        added.sort();
        removed.sort();
        changed.sort();
        SummaryDiff { added, removed, changed }
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

fn normalise_path(relative_path: &str) -> String {
    relative_path.replace('\\', "/")
}

fn config_matches(config: &ProfileConfig, normalised_path: &str) -> bool {
    if let Some(path) = &config.path {
        if normalise_path(path) == normalised_path {
            return true;
        }
    }
    if let Some(glob_pattern) = &config.path_glob {
        if let Ok(pattern) = glob::Pattern::new(glob_pattern) {
            if pattern.matches(normalised_path) {
                return true;
            }
        }
    }
    false
}

fn check_identifiers_unique(
    existing: &BTreeMap<String, ConfigurationProfile>,
    excluding_profile: Option<&str>,
    new_configs: &[ProfileConfig],
) -> Result<(), ProfileError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for config in new_configs {
        if !seen.insert(&config.identifier) {
            return Err(ProfileError::DuplicateConfigIdentifier {
                identifier: config.identifier.clone(),
            });
        }
    }
    for (name, profile) in existing {
        if Some(name.as_str()) == excluding_profile {
            continue;
        }
        for config in &profile.configs {
            if seen.contains(config.identifier.as_str()) {
                return Err(ProfileError::DuplicateConfigIdentifier {
                    identifier: config.identifier.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, tags: &[&str], configs: Vec<ProfileConfig>) -> ConfigurationProfile {
        ConfigurationProfile {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            configs,
            metadata: BTreeMap::new(),
        }
    }

    fn config(identifier: &str, path: Option<&str>, path_glob: Option<&str>) -> ProfileConfig {
        ProfileConfig {
            identifier: identifier.to_string(),
            path: path.map(str::to_string),
            path_glob: path_glob.map(str::to_string),
            application: None,
            version: None,
            branch: None,
            tags: BTreeSet::new(),
            expected_format: None,
            expected_variant: None,
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn registering_duplicate_profile_name_fails() {
        let store = ProfileStore::new();
        store.register_profile(profile("prod-web", &[], vec![])).unwrap();
        let result = store.register_profile(profile("prod-web", &[], vec![]));
        assert!(matches!(result, Err(ProfileError::DuplicateName { .. })));
    }

    #[test]
    fn config_identifiers_are_globally_unique() {
        let store = ProfileStore::new();
        store
            .register_profile(profile("a", &[], vec![config("web-config", Some("web/App.config"), None)]))
            .unwrap();
        let result = store.register_profile(profile(
            "b",
            &[],
            vec![config("web-config", Some("other/path"), None)],
        ));
        assert!(matches!(
            result,
            Err(ProfileError::DuplicateConfigIdentifier { .. })
        ));
    }

    #[test]
    fn applicable_profiles_respects_tag_subset() {
        let store = ProfileStore::new();
        store
            .register_profile(profile("prod-web", &["env:prod", "tier:web"], vec![]))
            .unwrap();
        let tags: BTreeSet<String> = ["env:prod", "tier:web", "extra"].iter().map(|s| s.to_string()).collect();
        let applicable = store.applicable_profiles(&tags);
        assert_eq!(applicable.len(), 1);

        let too_narrow: BTreeSet<String> = ["env:prod"].iter().map(|s| s.to_string()).collect();
        assert!(store.applicable_profiles(&too_narrow).is_empty());
    }

    #[test]
    fn matching_configs_normalises_windows_separators() {
        let store = ProfileStore::new();
        store
            .register_profile(profile(
                "prod-web",
                &["env:prod"],
                vec![config("web-config", Some("web/App.config"), None)],
            ))
            .unwrap();
        let tags: BTreeSet<String> = ["env:prod"].iter().map(|s| s.to_string()).collect();
        let matches = store.matching_configs(&tags, "web\\App.config");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn update_profile_rolls_back_on_validation_failure() {
        let store = ProfileStore::new();
        store
            .register_profile(profile("a", &[], vec![config("id-a", None, None)]))
            .unwrap();
        store
            .register_profile(profile("b", &[], vec![config("id-b", None, None)]))
            .unwrap();

        let result = store.update_profile("a", |p| {
            p.configs.push(config("id-b", None, None));
        });
        assert!(result.is_err());

        let (profile, _) = store.find_config("id-a").unwrap();
        assert_eq!(profile.configs.len(), 1);
    }

    #[test]
    fn summary_round_trips_through_serde() {
        let store = ProfileStore::new();
        store
            .register_profile(profile("a", &["x"], vec![config("id-a", None, None)]))
            .unwrap();
        let summary = store.summary();
        let json = serde_json::to_string(&summary).unwrap();
        let back: Vec<ProfileSummary> = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, back);
    }

    #[test]
    fn diff_summary_snapshots_detects_all_three_kinds() {
        let before = vec![
            ProfileSummary {
                name: "a".to_string(),
                tags: BTreeSet::new(),
                config_identifiers: vec!["x".to_string()],
            },
            ProfileSummary {
                name: "b".to_string(),
                tags: BTreeSet::new(),
                config_identifiers: vec![],
            },
        ];
        let after = vec![
            ProfileSummary {
                name: "a".to_string(),
                tags: BTreeSet::new(),
                config_identifiers: vec!["x".to_string(), "y".to_string()],
            },
            ProfileSummary {
                name: "c".to_string(),
                tags: BTreeSet::new(),
                config_identifiers: vec![],
            },
        ];
        let diff = ProfileStore::diff_summary_snapshots(&before, &after);
        assert_eq!(diff.added, vec!["c"]);
        assert_eq!(diff.removed, vec!["b"]);
        assert_eq!(diff.changed, vec!["a"]);
    }
}
