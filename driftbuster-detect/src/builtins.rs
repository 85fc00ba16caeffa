//! Assembles the registry of ten built-in format plugins,
//! registered in catalog-priority order so the first match wins
//! deterministically even before the registry's own stable sort runs.

use driftbuster_catalog::PluginRegistry;

use crate::plugins::{
    conf::ConfPlugin, dockerfile::DockerfilePlugin, hcl::HclPlugin, ini::IniPlugin,
    json::JsonPlugin, registry_live::RegistryLivePlugin, text::TextPlugin,
    toml_plugin::TomlPlugin, xml::XmlPlugin, yaml::YamlPlugin,
};

/// Build a fresh `PluginRegistry` with every built-in plugin registered.
/// Each call returns an independent registry; no global/static state is
/// shared across calls — tests construct private registries via this
/// factory.
pub fn default_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register(Box::new(DockerfilePlugin)).expect("dockerfile");
    registry.register(Box::new(RegistryLivePlugin)).expect("registry-live");
    registry.register(Box::new(YamlPlugin)).expect("yaml");
    registry.register(Box::new(TomlPlugin)).expect("toml");
    registry.register(Box::new(JsonPlugin)).expect("json");
    registry.register(Box::new(XmlPlugin)).expect("xml");
    registry.register(Box::new(HclPlugin)).expect("hcl");
    registry.register(Box::new(IniPlugin)).expect("ini");
    registry.register(Box::new(ConfPlugin)).expect("conf");
    registry.register(Box::new(TextPlugin)).expect("text");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_ten_plugins_in_priority_order() {
        let registry = default_registry();
        assert_eq!(registry.len(), 10);
        let priorities: Vec<i32> = registry.iter().map(|p| p.priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }
}
