//! Text/binary classification for rendering file contents.
//!
//! A heuristic only: it keeps callers from dumping binary data as text and
//! carries no security meaning.

/// Fraction of printable bytes a buffer must exceed to count as text.
const TEXT_THRESHOLD: f64 = 0.85;

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

/// Classify a byte buffer as text or binary.
///
/// Empty input is text. Any NUL byte makes it binary. Otherwise it is text
/// when more than 85% of the bytes are printable ASCII (32..=126) or one of
/// `\n`, `\r`, `\t`.
pub fn classify(bytes: &[u8]) -> ContentKind {
    if bytes.is_empty() {
        return ContentKind::Text;
    }
    if bytes.contains(&0) {
        return ContentKind::Binary;
    }

    let printable = bytes.iter().filter(|&&b| is_printable(b)).count();
    if printable as f64 / bytes.len() as f64 > TEXT_THRESHOLD {
        ContentKind::Text
    } else {
        ContentKind::Binary
    }
}

/// Shorthand for `classify(bytes) == ContentKind::Text`.
pub fn is_text(bytes: &[u8]) -> bool {
    classify(bytes) == ContentKind::Text
}

fn is_printable(b: u8) -> bool {
    matches!(b, 32..=126 | b'\n' | b'\r' | b'\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_text() {
        assert_eq!(classify(b""), ContentKind::Text);
    }

    #[test]
    fn nul_byte_is_binary() {
        assert_eq!(classify(b"hello\x00world"), ContentKind::Binary);
    }

    #[test]
    fn ninety_one_percent_printable_is_text() {
        // 10 printable + 1 control byte.
        let bytes = b"abcdefghij\x01";
        assert_eq!(bytes.len(), 11);
        assert!(is_text(bytes));
    }

    #[test]
    fn seventy_five_percent_printable_is_binary() {
        // 6 printable + 2 high bytes.
        let bytes = b"abcdef\xff\xfe";
        assert_eq!(bytes.len(), 8);
        assert_eq!(classify(bytes), ContentKind::Binary);
    }

    #[test]
    fn whitespace_controls_count_as_printable() {
        assert!(is_text(b"line one\r\n\tline two\n"));
    }

    #[test]
    fn exactly_threshold_is_binary() {
        // 17/20 = 0.85, which does not exceed the threshold.
        let mut bytes = vec![b'a'; 17];
        bytes.extend_from_slice(&[0x01, 0x02, 0x03]);
        assert_eq!(classify(&bytes), ContentKind::Binary);
    }

    #[test]
    fn utf8_heavy_text_is_binary() {
        // Non-ASCII bytes are not counted as printable.
        assert_eq!(classify("日本語のテキスト".as_bytes()), ContentKind::Binary);
    }
}
