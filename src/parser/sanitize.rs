//! Loading and sanitizing export files.

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

const BOM: char = '\u{FEFF}';

/// Read an export file and return text safe to hand to the XML parser.
///
/// Invalid UTF-8 sequences become U+FFFD and characters outside the XML 1.0
/// character ranges are removed. A leading byte-order mark is dropped.
pub fn load_export<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    Ok(sanitize_bytes(&bytes))
}

/// Decode bytes as UTF-8 (lossy) and sanitize the result.
pub fn sanitize_bytes(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix(BOM).unwrap_or(&text);
    sanitize_xml(text)
}

/// Remove every character that is not legal in an XML 1.0 document.
pub fn sanitize_xml(text: &str) -> String {
    text.chars().filter(|&c| is_xml_char(c)).collect()
}

/// Check a character against the XML 1.0 `Char` production.
///
/// Surrogates cannot appear in a Rust `char`, so only the control range and
/// the two noncharacters at the end of the BMP are excluded explicitly.
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize_xml("a\u{0}b\u{1}c\u{1F}d"), "abcd");
        assert_eq!(sanitize_xml("tab\there\r\nnext"), "tab\there\r\nnext");
    }

    #[test]
    fn test_strips_bmp_noncharacters() {
        assert_eq!(sanitize_xml("x\u{FFFE}y\u{FFFF}z"), "xyz");
        assert_eq!(sanitize_xml("keep \u{FFFD} and \u{1F600}"), "keep \u{FFFD} and \u{1F600}");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let text = sanitize_bytes(b"<a>caf\xe9</a>");
        assert_eq!(text, "<a>caf\u{FFFD}</a>");
    }

    #[test]
    fn test_leading_bom_is_dropped() {
        let text = sanitize_bytes("\u{FEFF}<rss/>".as_bytes());
        assert_eq!(text, "<rss/>");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_export("/definitely/not/here/export.xml");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_load_file_with_nul_byte() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<rss><title>a\x00b</title></rss>").unwrap();

        let text = load_export(file.path()).unwrap();
        assert_eq!(text, "<rss><title>ab</title></rss>");
    }
}
