//! `PluginRegistry` — the ordered, immutable-after-freeze set of active
//! format plugins (`Vec<Box<dyn Plugin>>`, panic-catching dispatch), run
//! first-match-wins rather than running every plugin.

use std::collections::HashSet;
use std::path::Path;

use driftbuster_core::types::catalog::PluginSummary;
use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;

use crate::errors::CatalogError;

/// Registry of active format plugins, iterated in `(priority, registration
/// index)` order — stable across the process lifetime.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
    names: HashSet<&'static str>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register a plugin. Fails atomically with `DuplicateName` if another
    /// plugin with the same name is already registered — no partial state
    /// leaks on failure.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<(), CatalogError> {
        let name = plugin.name();
        if !self.names.insert(name) {
            return Err(CatalogError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.plugins.push(plugin);
        // Stable sort by priority only; registration order is preserved by
        // Rust's sort_by_key being stable, so ties keep insertion order.
        self.plugins.sort_by_key(|p| p.priority());
        Ok(())
    }

    /// Total number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Iterate plugins in registry order (ascending priority, ties broken
    /// by registration order — guaranteed by the stable sort above).
    pub fn iter(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }

    /// Invoke plugins in order; the first `Some` wins.
    /// A plugin fault (panic) is caught, logged, and treated as a decline.
    pub fn detect_first(
        &self,
        path: &Path,
        sample: &[u8],
        text: Option<&str>,
    ) -> Option<DetectionMatch> {
        for plugin in &self.plugins {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                plugin.detect(path, sample, text)
            }));
            match result {
                Ok(Some(m)) => return Some(m),
                Ok(None) => continue,
                Err(_) => {
                    tracing::error!(plugin = plugin.name(), "plugin panicked during detection");
                    continue;
                }
            }
        }
        None
    }

    /// A deterministic snapshot sequence, ordered by `(priority ascending,
    /// registration index ascending)`.
    pub fn summary(&self) -> Vec<PluginSummary> {
        self.plugins
            .iter()
            .enumerate()
            .map(|(index, plugin)| PluginSummary {
                index,
                name: plugin.name().to_string(),
                module_id: module_id_of(plugin.as_ref()),
                priority: plugin.priority(),
                version: plugin.version().to_string(),
            })
            .collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn module_id_of(plugin: &dyn Plugin) -> String {
    format!("driftbuster-detect::plugins::{}", plugin.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct StubPlugin {
        name: &'static str,
        priority: i32,
    }

    impl Plugin for StubPlugin {
        fn name(&self) -> &'static str {
            self.name
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn version(&self) -> &'static str {
            "0.1.0"
        }
        fn detect(&self, _path: &Path, _sample: &[u8], _text: Option<&str>) -> Option<DetectionMatch> {
            None
        }
    }

    #[test]
    fn registering_duplicate_name_fails() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(StubPlugin {
                name: "a",
                priority: 1,
            }))
            .unwrap();
        let result = registry.register(Box::new(StubPlugin {
            name: "a",
            priority: 2,
        }));
        assert!(matches!(result, Err(CatalogError::DuplicateName { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn summary_is_ordered_by_priority_then_registration() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(StubPlugin {
                name: "b",
                priority: 20,
            }))
            .unwrap();
        registry
            .register(Box::new(StubPlugin {
                name: "a",
                priority: 10,
            }))
            .unwrap();
        registry
            .register(Box::new(StubPlugin {
                name: "c",
                priority: 10,
            }))
            .unwrap();

        let summary = registry.summary();
        let names: Vec<_> = summary.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn summary_is_stable_across_calls() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(StubPlugin {
                name: "a",
                priority: 1,
            }))
            .unwrap();
        assert_eq!(registry.summary(), registry.summary());
    }
}
