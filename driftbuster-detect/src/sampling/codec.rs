//! Best-effort text decoding: BOM-first, then UTF-8 strict, then Latin-1.
//!
//! Never raises on decode failure — the caller proceeds with `text = None`.

/// The outcome of attempting to decode a byte sample as text.
pub struct DecodedText {
    pub text: Option<String>,
    pub encoding: Option<&'static str>,
}

/// Probe `sample` for a BOM, then try strict UTF-8, then fall back to
/// Latin-1 (which always succeeds, since every byte is a valid Latin-1
/// code point).
pub fn decode_sample(sample: &[u8]) -> DecodedText {
    if let Some((text, encoding)) = decode_bom(sample) {
        return DecodedText {
            text: Some(text),
            encoding: Some(encoding),
        };
    }

    if let Ok(text) = std::str::from_utf8(sample) {
        return DecodedText {
            text: Some(text.to_string()),
            encoding: Some("utf-8"),
        };
    }

    // Latin-1 (ISO-8859-1) never fails: every byte maps to a code point.
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(sample);
    DecodedText {
        text: Some(text.into_owned()),
        encoding: Some("latin-1"),
    }
}

fn decode_bom(sample: &[u8]) -> Option<(String, &'static str)> {
    if let Some(rest) = sample.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return std::str::from_utf8(rest)
            .ok()
            .map(|s| (s.to_string(), "utf-8-bom"));
    }
    if let Some(rest) = sample.strip_prefix(&[0xFF, 0xFE, 0x00, 0x00]) {
        return decode_utf32(rest, u32::from_le_bytes).map(|s| (s, "utf-32le"));
    }
    if let Some(rest) = sample.strip_prefix(&[0x00, 0x00, 0xFE, 0xFF]) {
        return decode_utf32(rest, u32::from_be_bytes).map(|s| (s, "utf-32be"));
    }
    if let Some(rest) = sample.strip_prefix(&[0xFF, 0xFE]) {
        let (text, _, _) = encoding_rs::UTF_16LE.decode(rest);
        return Some((text.into_owned(), "utf-16le"));
    }
    if let Some(rest) = sample.strip_prefix(&[0xFE, 0xFF]) {
        let (text, _, _) = encoding_rs::UTF_16BE.decode(rest);
        return Some((text.into_owned(), "utf-16be"));
    }
    None
}

/// Decode a UTF-32 byte sequence (no BOM) into a `String`, stopping at the
/// last complete code point in the sample.
fn decode_utf32(bytes: &[u8], from_bytes: fn([u8; 4]) -> u32) -> Option<String> {
    let mut out = String::new();
    for chunk in bytes.chunks_exact(4) {
        let array: [u8; 4] = chunk.try_into().ok()?;
        let scalar = from_bytes(array);
        out.push(char::from_u32(scalar)?);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_utf8() {
        let decoded = decode_sample(b"hello world");
        assert_eq!(decoded.encoding, Some("utf-8"));
        assert_eq!(decoded.text.as_deref(), Some("hello world"));
    }

    #[test]
    fn decodes_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"hi");
        let decoded = decode_sample(&bytes);
        assert_eq!(decoded.encoding, Some("utf-8-bom"));
        assert_eq!(decoded.text.as_deref(), Some("hi"));
    }

    #[test]
    fn never_fails_on_arbitrary_bytes() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let decoded = decode_sample(&bytes);
        assert!(decoded.text.is_some());
    }
}
