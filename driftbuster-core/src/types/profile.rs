//! Profile Store data model.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One expected configuration within a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    pub identifier: String,
    pub path: Option<String>,
    pub path_glob: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub expected_format: Option<String>,
    #[serde(default)]
    pub expected_variant: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// A tag-activated set of expected configurations.
///
/// A profile applies when its `tags` are a subset of the caller-supplied
/// tag set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationProfile {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub configs: Vec<ProfileConfig>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ConfigurationProfile {
    /// Does this profile's activation tag set apply under `caller_tags`?
    pub fn applies_under(&self, caller_tags: &BTreeSet<String>) -> bool {
        self.tags.is_subset(caller_tags)
    }
}
