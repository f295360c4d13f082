//! JSON string escaping for the encoder and unescaping for the scanner
//!
//! The escape set is wider than JSON requires: `<` and `'` are written as
//! `\u003c` and `\u0027` so a record can be embedded in HTML or script
//! without further processing.

use std::borrow::Cow;

const fn escape_table() -> [bool; 256] {
    let mut table = [false; 256];
    table[b'"' as usize] = true;
    table[b'\\' as usize] = true;
    table[b'\n' as usize] = true;
    table[b'\r' as usize] = true;
    table[b'\t' as usize] = true;
    table[0x0c] = true;
    table[0x08] = true;
    table[b'<' as usize] = true;
    table[b'\'' as usize] = true;
    table[0] = true;
    table
}

static ESCAPES: [bool; 256] = escape_table();

/// Escape sequence for a reserved byte, or `None` if it is copied as is.
#[inline]
pub fn escape_sequence(c: u8) -> Option<&'static [u8]> {
    match c {
        b'"' => Some(b"\\\""),
        b'\\' => Some(b"\\\\"),
        b'\n' => Some(b"\\n"),
        b'\r' => Some(b"\\r"),
        b'\t' => Some(b"\\t"),
        0x0c => Some(b"\\u000c"),
        0x08 => Some(b"\\u0008"),
        b'<' => Some(b"\\u003c"),
        b'\'' => Some(b"\\u0027"),
        0 => Some(b"\\u0000"),
        _ => None,
    }
}

#[inline]
pub fn needs_escape(src: &[u8]) -> bool {
    src.iter().any(|&c| ESCAPES[c as usize])
}

/// Append `src` to `dst`, escaping reserved bytes.
///
/// Scans once; when nothing needs escaping the bytes are copied in one go.
/// Otherwise the input is copied segment by segment with an escape written
/// at each reserved byte.
pub fn append_escaped(dst: &mut Vec<u8>, src: &[u8]) {
    if !needs_escape(src) {
        dst.extend_from_slice(src);
        return;
    }
    append_escaped_slow(dst, src);
}

#[inline]
pub fn append_escaped_str(dst: &mut Vec<u8>, src: &str) {
    append_escaped(dst, src.as_bytes());
}

fn append_escaped_slow(dst: &mut Vec<u8>, src: &[u8]) {
    let mut start = 0;
    for (i, &c) in src.iter().enumerate() {
        if let Some(seq) = escape_sequence(c) {
            dst.extend_from_slice(&src[start..i]);
            dst.extend_from_slice(seq);
            start = i + 1;
        }
    }
    dst.extend_from_slice(&src[start..]);
}

/// Escaped copy of `src`, borrowed when no byte needs escaping.
pub fn escape(src: &[u8]) -> Cow<'_, [u8]> {
    if !needs_escape(src) {
        return Cow::Borrowed(src);
    }
    let mut out = Vec::with_capacity(src.len() + 8);
    append_escaped_slow(&mut out, src);
    Cow::Owned(out)
}

/// Reverse JSON string escaping on the body of a string literal.
///
/// Returns `None` on a malformed escape or an unpaired surrogate.
pub fn unescape(src: &str) -> Option<Cow<'_, str>> {
    if !src.contains('\\') {
        return Some(Cow::Borrowed(src));
    }

    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len());
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        out.push_str(&src[start..i]);
        let esc = *bytes.get(i + 1)?;
        i += 2;
        match esc {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let hi = parse_hex4(bytes.get(i..i + 4)?)?;
                i += 4;
                let code = if (0xD800..0xDC00).contains(&hi) {
                    if bytes.get(i) != Some(&b'\\') || bytes.get(i + 1) != Some(&b'u') {
                        return None;
                    }
                    let lo = parse_hex4(bytes.get(i + 2..i + 6)?)?;
                    if !(0xDC00..0xE000).contains(&lo) {
                        return None;
                    }
                    i += 6;
                    0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)
                } else {
                    hi
                };
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
        start = i;
    }
    out.push_str(&src[start..]);
    Some(Cow::Owned(out))
}

fn parse_hex4(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &d| {
        let v = (d as char).to_digit(16)?;
        Some(acc * 16 + v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &str) -> String {
        let mut out = Vec::new();
        append_escaped_str(&mut out, s);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_fast_path_identity() {
        assert_eq!(escaped("plain text 123 é"), "plain text 123 é");
        assert!(matches!(escape(b"abc"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_standard_escapes() {
        assert_eq!(escaped("a\"b"), "a\\\"b");
        assert_eq!(escaped("back\\slash"), "back\\\\slash");
        assert_eq!(escaped("l1\nl2\r\tend"), "l1\\nl2\\r\\tend");
    }

    #[test]
    fn test_extended_escapes() {
        assert_eq!(escaped("<script>"), "\\u003cscript>");
        assert_eq!(escaped("it's"), "it\\u0027s");
        assert_eq!(escaped("\u{0}\u{8}\u{c}"), "\\u0000\\u0008\\u000c");
    }

    #[test]
    fn test_escape_at_boundaries() {
        assert_eq!(escaped("\"x\""), "\\\"x\\\"");
        assert_eq!(escaped("\n"), "\\n");
    }

    #[test]
    fn test_unescape_round_trip() {
        let original = "quote\" back\\ nl\n tab\t <tag> it's \u{0} \u{8}\u{c}";
        let enc = escaped(original);
        assert_eq!(unescape(&enc).unwrap(), original);
    }

    #[test]
    fn test_unescape_unicode() {
        assert_eq!(unescape("\\u00e9").unwrap(), "é");
        assert_eq!(unescape("\\ud83d\\ude00").unwrap(), "😀");
        assert_eq!(unescape("a\\/b").unwrap(), "a/b");
    }

    #[test]
    fn test_unescape_rejects_malformed() {
        assert!(unescape("bad\\x").is_none());
        assert!(unescape("trailing\\").is_none());
        assert!(unescape("\\ud83d alone").is_none());
        assert!(unescape("\\u12").is_none());
    }

    #[test]
    fn test_unescape_borrows_when_clean() {
        assert!(matches!(unescape("clean").unwrap(), Cow::Borrowed(_)));
    }
}
