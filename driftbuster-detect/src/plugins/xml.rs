//! XML format plugin (catalog priority 40).
//!
//! State machine: `prolog → root-detect → namespace-scan →
//! variant-classify → metadata-emit`.

use std::path::Path;

use driftbuster_core::types::detection::DetectionMatch;
use driftbuster_core::Plugin;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{extension_lower, MatchBuilder};

pub struct XmlPlugin;

impl Plugin for XmlPlugin {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn priority(&self) -> i32 {
        40
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn detect(&self, path: &Path, _sample: &[u8], text: Option<&str>) -> Option<DetectionMatch> {
        let text = text?;
        let trimmed = text.trim_start();

        let has_prolog = trimmed.starts_with("<?xml");
        let looks_like_markup = trimmed.starts_with('<');
        if !has_prolog && !looks_like_markup {
            return None;
        }

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut root_tag = None;
        let mut namespaces = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if root_tag.is_none() {
                        root_tag = Some(String::from_utf8_lossy(e.name().as_ref()).to_string());
                        for attr in e.attributes().flatten() {
                            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                            if key == "xmlns" || key.starts_with("xmlns:") {
                                namespaces.push(key);
                            }
                        }
                    }
                    break;
                }
                Ok(Event::Eof) => break,
                Err(_) => return None,
                _ => {}
            }
            buf.clear();
        }

        let root_tag = root_tag?;

        let mut builder = MatchBuilder::new("xml").reason("well-formed XML with a detected root element");

        if has_prolog {
            builder = builder.reason("has XML prolog").boost(0.15);
        }
        if extension_lower(path).as_deref() == Some("xml") {
            builder = builder.boost(0.1);
        }

        namespaces.sort();
        builder = builder
            .meta("root_tag", root_tag.clone())
            .meta("namespaces", namespaces.clone());

        let extension = extension_lower(path);
        let variant = match extension.as_deref() {
            Some("config") | Some("csproj") | Some("props") => "structured-config-xml",
            _ if root_tag.eq_ignore_ascii_case("configuration") => "structured-config-xml",
            _ if !namespaces.is_empty() => "namespaced-document-xml",
            _ => "generic-document-xml",
        };

        Some(builder.variant(variant).build(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_structured_config_by_extension() {
        let plugin = XmlPlugin;
        let text = r#"<?xml version="1.0"?><configuration><appSettings/></configuration>"#;
        let m = plugin
            .detect(&PathBuf::from("web/App.config"), text.as_bytes(), Some(text))
            .unwrap();
        assert_eq!(m.variant.as_deref(), Some("structured-config-xml"));
        assert_eq!(m.metadata.get("root_tag").and_then(|v| v.as_str()), Some("configuration"));
    }

    #[test]
    fn declines_non_xml_text() {
        let plugin = XmlPlugin;
        let text = "just some plain text";
        let m = plugin.detect(&PathBuf::from("a.txt"), text.as_bytes(), Some(text));
        assert!(m.is_none());
    }

    #[test]
    fn picks_up_namespaces() {
        let plugin = XmlPlugin;
        let text = r#"<root xmlns:foo="urn:foo"><child/></root>"#;
        let m = plugin
            .detect(&PathBuf::from("a.xml"), text.as_bytes(), Some(text))
            .unwrap();
        let ns = m.metadata.get("namespaces").unwrap().as_array().unwrap();
        assert_eq!(ns.len(), 1);
    }
}
