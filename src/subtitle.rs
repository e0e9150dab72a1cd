use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static INDEX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").expect("index pattern is valid")
});

static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2},\d{3}\s+-->\s+\d{2}:\d{2}:\d{2},\d{3}")
        .expect("timecode pattern is valid")
});

const UTF8_BOM: char = '\u{feff}';

/// Kind of a single script line. Only `Dialogue` lines are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Blank,
    Index,
    Timecode,
    Dialogue,
}

impl LineKind {
    pub fn is_structural(self) -> bool {
        !matches!(self, LineKind::Dialogue)
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Blank => "blank",
            LineKind::Index => "index",
            LineKind::Timecode => "timecode",
            LineKind::Dialogue => "dialogue",
        };
        f.pad(name)
    }
}

/// Classify a raw line. Checks run in priority order: blank, index, timecode.
/// Anything that fails all three, including malformed indices or timecodes,
/// is dialogue.
pub fn classify(raw_line: &str) -> LineKind {
    let trimmed = raw_line.trim();

    if trimmed.is_empty() {
        LineKind::Blank
    } else if INDEX_REGEX.is_match(trimmed) {
        LineKind::Index
    } else if TIMECODE_REGEX.is_match(trimmed) {
        LineKind::Timecode
    } else {
        LineKind::Dialogue
    }
}

/// Which decoding produced the text of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

/// Decoded input text. A leading UTF-8 byte order mark is split off so the
/// first line classifies correctly, and restored by [`DecodedText::restore`].
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: SourceEncoding,
    pub has_bom: bool,
}

impl DecodedText {
    /// Re-attach the byte order mark, if the input had one
    pub fn restore(&self, text: String) -> String {
        if self.has_bom {
            let mut restored = String::with_capacity(text.len() + UTF8_BOM.len_utf8());
            restored.push(UTF8_BOM);
            restored.push_str(&text);
            restored
        } else {
            text
        }
    }
}

/// Decode uploaded bytes: UTF-8 first, Latin-1 otherwise. Latin-1 maps every
/// byte to a code point, so decoding never fails.
pub fn decode_text(bytes: &[u8]) -> DecodedText {
    let (text, encoding) = match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), SourceEncoding::Utf8),
        Err(_) => (
            bytes.iter().map(|&b| b as char).collect::<String>(),
            SourceEncoding::Latin1,
        ),
    };

    match text.strip_prefix(UTF8_BOM) {
        Some(rest) => DecodedText {
            text: rest.to_string(),
            encoding,
            has_bom: true,
        },
        None => DecodedText {
            text,
            encoding,
            has_bom: false,
        },
    }
}

/// Split a line into its content and an optional trailing carriage return
pub fn split_line_ending(line: &str) -> (&str, &str) {
    match line.strip_suffix('\r') {
        Some(content) => (content, "\r"),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_structural_lines() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   \t"), LineKind::Blank);
        assert_eq!(classify("1"), LineKind::Index);
        assert_eq!(classify("  42  "), LineKind::Index);
        assert_eq!(classify("00:00:01,000 --> 00:00:03,000"), LineKind::Timecode);
        assert_eq!(classify("01:02:03,456   -->  01:02:05,000 X1:10"), LineKind::Timecode);
    }

    #[test]
    fn test_classify_dialogue() {
        assert_eq!(classify("Tyler: Let's go!"), LineKind::Dialogue);
        assert_eq!(classify("Go for it"), LineKind::Dialogue);
        assert_eq!(classify("12a"), LineKind::Dialogue);
    }

    #[test]
    fn test_malformed_structure_falls_through_to_dialogue() {
        assert_eq!(classify("00:00:01 --> 00:00:03"), LineKind::Dialogue);
        assert_eq!(classify("0:00:01,000 --> 00:00:03,000"), LineKind::Dialogue);
        assert_eq!(classify("1 2"), LineKind::Dialogue);
        assert_eq!(classify("-5"), LineKind::Dialogue);
    }

    #[test]
    fn test_decode_utf8_and_latin1() {
        let decoded = decode_text("Cảm ơn".as_bytes());
        assert_eq!(decoded.text, "Cảm ơn");
        assert_eq!(decoded.encoding, SourceEncoding::Utf8);

        let decoded = decode_text(&[b'C', b'a', b'f', 0xE9]);
        assert_eq!(decoded.text, "Café");
        assert_eq!(decoded.encoding, SourceEncoding::Latin1);
    }

    #[test]
    fn test_decode_keeps_bom_aside() {
        let decoded = decode_text("\u{feff}1\nHi".as_bytes());
        assert!(decoded.has_bom);
        assert_eq!(decoded.text, "1\nHi");
        assert_eq!(classify(decoded.text.lines().next().unwrap()), LineKind::Index);
        assert_eq!(decoded.restore("1\nHi".to_string()), "\u{feff}1\nHi");
    }

    #[test]
    fn test_split_line_ending() {
        assert_eq!(split_line_ending("Hi\r"), ("Hi", "\r"));
        assert_eq!(split_line_ending("Hi"), ("Hi", ""));
    }
}
