//! `canonicalise_text`/`canonicalise_xml`/`canonicalise_json`.
//! Canonicalisation is idempotent: `canonicalise_text(canonicalise_text(x))
//! == canonicalise_text(x)`, and likewise for the structural forms.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Result of a structural canonicalisation attempt. `fell_back` is set
/// when the input didn't parse and `text` is text-canonicalised instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalOutput {
    pub text: String,
    pub fell_back: bool,
}

/// Normalise line endings to `\n`, strip trailing whitespace per line,
/// preserve line order.
pub fn canonicalise_text(s: &str) -> String {
    let normalised = s.replace("\r\n", "\n").replace('\r', "\n");
    normalised
        .split('\n')
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim insignificant inter-element whitespace, sort attributes by local
/// name, serialise deterministically. Falls back to `canonicalise_text`
/// on a malformed document.
pub fn canonicalise_xml(s: &str) -> CanonicalOutput {
    match canonicalise_xml_inner(s) {
        Some(text) => CanonicalOutput { text, fell_back: false },
        None => CanonicalOutput {
            text: canonicalise_text(s),
            fell_back: true,
        },
    }
}

fn canonicalise_xml_inner(s: &str) -> Option<String> {
    let mut reader = Reader::from_str(s);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Decl(_)) => {}
            Ok(Event::Start(e)) => writer.write_event(Event::Start(sorted_start(&e))).ok()?,
            Ok(Event::Empty(e)) => writer.write_event(Event::Empty(sorted_start(&e))).ok()?,
            Ok(event) => writer.write_event(event).ok()?,
            Err(_) => return None,
        }
        buf.clear();
    }

    String::from_utf8(writer.into_inner()).ok()
}

fn sorted_start<'a>(start: &BytesStart<'a>) -> BytesStart<'a> {
    let mut attrs: Vec<(Vec<u8>, Vec<u8>)> = start
        .attributes()
        .flatten()
        .map(|a| (a.key.as_ref().to_vec(), a.value.as_ref().to_vec()))
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut rebuilt = BytesStart::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for (key, value) in &attrs {
        rebuilt.push_attribute((
            String::from_utf8_lossy(key).as_ref(),
            String::from_utf8_lossy(value).as_ref(),
        ));
    }
    rebuilt
}

/// Parse and re-emit with sorted object keys. Falls back to
/// `canonicalise_text` on a malformed document.
pub fn canonicalise_json(s: &str) -> CanonicalOutput {
    match serde_json::from_str::<serde_json::Value>(s) {
        Ok(value) => CanonicalOutput {
            text: serde_json::to_string_pretty(&value).unwrap_or_else(|_| canonicalise_text(s)),
            fell_back: false,
        },
        Err(_) => CanonicalOutput {
            text: canonicalise_text(s),
            fell_back: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_canonicalisation_is_idempotent() {
        let input = "line one \r\nline two\t\r\nline three";
        let once = canonicalise_text(input);
        let twice = canonicalise_text(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "line one\nline two\nline three");
    }

    #[test]
    fn xml_canonicalisation_sorts_attributes() {
        let input = r#"<root z="1" a="2"><child/></root>"#;
        let out = canonicalise_xml(input);
        assert!(!out.fell_back);
        let a_pos = out.text.find("a=\"2\"").unwrap();
        let z_pos = out.text.find("z=\"1\"").unwrap();
        assert!(a_pos < z_pos);
    }

    #[test]
    fn xml_falls_back_to_text_on_malformed_input() {
        let input = "<root><unterminated>";
        let out = canonicalise_xml(input);
        assert!(out.fell_back);
        assert_eq!(out.text, canonicalise_text(input));
    }

    #[test]
    fn json_canonicalisation_sorts_keys() {
        let input = r#"{"z": 1, "a": 2}"#;
        let out = canonicalise_json(input);
        assert!(!out.fell_back);
        let a_pos = out.text.find("\"a\"").unwrap();
        let z_pos = out.text.find("\"z\"").unwrap();
        assert!(a_pos < z_pos);
    }

    #[test]
    fn json_falls_back_to_text_on_malformed_input() {
        let input = "{not valid json";
        let out = canonicalise_json(input);
        assert!(out.fell_back);
    }

    #[test]
    fn json_canonicalisation_is_idempotent() {
        let input = r#"{"b": [1, 2], "a": "x"}"#;
        let once = canonicalise_json(input);
        let twice = canonicalise_json(&once.text);
        assert_eq!(once.text, twice.text);
    }
}
