//! Single-pass scanner that recovers the fields of a wire record
//!
//! The scanner reads one record left to right and never builds a JSON
//! tree. Nested objects, arrays and `null` are skipped as opaque text and
//! surface as [`ValueType::Raw`].

use crate::core::escape::unescape;
use std::borrow::Cow;

/// Shape of a recovered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// JSON string, already unescaped
    String,
    Number,
    True,
    False,
    /// Object, array or `null`, kept as the original text
    Raw,
}

/// One field that is not part of the fixed record header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue<'a> {
    pub key: Cow<'a, str>,
    pub value: Cow<'a, str>,
    pub value_type: ValueType,
}

/// Structured view of one wire record, rebuilt per record.
///
/// Header fields that are absent from the record are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterArgs<'a> {
    pub time: Cow<'a, str>,
    pub level: Cow<'a, str>,
    pub goid: Cow<'a, str>,
    pub caller: Cow<'a, str>,
    pub caller_func: Cow<'a, str>,
    pub stack: Cow<'a, str>,
    pub message: Cow<'a, str>,
    /// Remaining fields in record order; repeated keys are all kept
    pub key_values: Vec<KeyValue<'a>>,
}

impl<'a> FormatterArgs<'a> {
    /// Parse a record whose timestamp field is named `time`.
    ///
    /// Returns `None` when the input is not a structured record: not UTF-8,
    /// not a single JSON object, truncated, or without a timestamp.
    ///
    /// ```
    /// use zlog::formatter::{FormatterArgs, ValueType};
    ///
    /// let args = FormatterArgs::parse(br#"{"time":"t","level":"info","n":1,"message":"hi"}"#).unwrap();
    /// assert_eq!(args.level, "info");
    /// assert_eq!(args.key_values[0].value_type, ValueType::Number);
    /// assert!(FormatterArgs::parse(b"plain text").is_none());
    /// ```
    pub fn parse(record: &'a [u8]) -> Option<Self> {
        Self::parse_with(record, "time")
    }

    /// Parse a record whose timestamp field is named `time_field`.
    pub fn parse_with(record: &'a [u8], time_field: &str) -> Option<Self> {
        let src = std::str::from_utf8(record).ok()?;
        let mut scanner = Scanner { src, pos: 0 };
        let mut args = FormatterArgs::default();
        let mut has_time = false;

        scanner.skip_ws();
        scanner.expect(b'{')?;
        scanner.skip_ws();
        if !scanner.eat(b'}') {
            loop {
                scanner.skip_ws();
                let key = scanner.string()?;
                scanner.skip_ws();
                scanner.expect(b':')?;
                scanner.skip_ws();
                let (value, value_type) = scanner.value()?;

                match key.as_ref() {
                    k if k == time_field => {
                        args.time = value;
                        has_time = true;
                    }
                    "level" => args.level = value,
                    "goid" => args.goid = value,
                    "caller" => args.caller = value,
                    "callerfunc" => args.caller_func = value,
                    "stack" => args.stack = value,
                    "message" | "msg" => args.message = value,
                    _ => args.key_values.push(KeyValue {
                        key,
                        value,
                        value_type,
                    }),
                }

                scanner.skip_ws();
                match scanner.bump()? {
                    b',' => continue,
                    b'}' => break,
                    _ => return None,
                }
            }
        }

        scanner.skip_ws();
        if !scanner.at_end() || !has_time || args.time.is_empty() {
            return None;
        }
        Some(args)
    }

    /// Value of the first non-header field named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_values
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_ref())
    }
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Option<()> {
        self.eat(b).then_some(())
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Index just past the closing quote of the string starting at `self.pos`.
    fn string_end(&self) -> Option<usize> {
        let bytes = self.bytes();
        let mut i = self.pos + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => return Some(i + 1),
                _ => i += 1,
            }
        }
        None
    }

    fn string(&mut self) -> Option<Cow<'a, str>> {
        if self.peek() != Some(b'"') {
            return None;
        }
        let end = self.string_end()?;
        let src: &'a str = self.src;
        let raw = src.get(self.pos + 1..end - 1)?;
        self.pos = end;
        unescape(raw)
    }

    fn number(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
        ) {
            self.pos += 1;
        }
        let src: &'a str = self.src;
        let text = &src[start..self.pos];
        text.parse::<f64>().ok().map(|_| text)
    }

    fn literal(&mut self, word: &str) -> Option<()> {
        if self.src[self.pos..].starts_with(word) {
            self.pos += word.len();
            Some(())
        } else {
            None
        }
    }

    /// Skip a nested object or array, returning its text.
    fn composite(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek()? {
                b'"' => {
                    self.pos = self.string_end()?;
                    continue;
                }
                b'{' | b'[' => depth += 1,
                b'}' | b']' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        self.pos += 1;
                        break;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        let src: &'a str = self.src;
        Some(&src[start..self.pos])
    }

    fn value(&mut self) -> Option<(Cow<'a, str>, ValueType)> {
        match self.peek()? {
            b'"' => Some((self.string()?, ValueType::String)),
            b'{' | b'[' => Some((Cow::Borrowed(self.composite()?), ValueType::Raw)),
            b't' => {
                self.literal("true")?;
                Some((Cow::Borrowed("true"), ValueType::True))
            }
            b'f' => {
                self.literal("false")?;
                Some((Cow::Borrowed("false"), ValueType::False))
            }
            b'n' => {
                self.literal("null")?;
                Some((Cow::Borrowed("null"), ValueType::Raw))
            }
            b'-' | b'0'..=b'9' => Some((Cow::Borrowed(self.number()?), ValueType::Number)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields() {
        let record = br#"{"time":"2024-01-02T03:04:05Z","level":"warn","caller":"src/main.rs:7","callerfunc":"main","goid":3,"stack":"trace\nline","message":"hello"}
"#;
        let args = FormatterArgs::parse(record).unwrap();
        assert_eq!(args.time, "2024-01-02T03:04:05Z");
        assert_eq!(args.level, "warn");
        assert_eq!(args.caller, "src/main.rs:7");
        assert_eq!(args.caller_func, "main");
        assert_eq!(args.goid, "3");
        assert_eq!(args.stack, "trace\nline");
        assert_eq!(args.message, "hello");
        assert!(args.key_values.is_empty());
    }

    #[test]
    fn test_value_types_in_order() {
        let record = br#"{"time":1,"s":"a\"b","n":-1.5e3,"t":true,"f":false,"z":null,"o":{"x":[1,"}"]},"a":[{"y":2}]}"#;
        let args = FormatterArgs::parse(record).unwrap();
        let got: Vec<(&str, &str, ValueType)> = args
            .key_values
            .iter()
            .map(|kv| (kv.key.as_ref(), kv.value.as_ref(), kv.value_type))
            .collect();
        assert_eq!(
            got,
            vec![
                ("s", "a\"b", ValueType::String),
                ("n", "-1.5e3", ValueType::Number),
                ("t", "true", ValueType::True),
                ("f", "false", ValueType::False),
                ("z", "null", ValueType::Raw),
                ("o", r#"{"x":[1,"}"]}"#, ValueType::Raw),
                ("a", r#"[{"y":2}]"#, ValueType::Raw),
            ]
        );
    }

    #[test]
    fn test_numeric_time_accepted() {
        let args = FormatterArgs::parse(br#"{"time":1736332245.123,"level":"info"}"#).unwrap();
        assert_eq!(args.time, "1736332245.123");
    }

    #[test]
    fn test_duplicates() {
        let args =
            FormatterArgs::parse(br#"{"time":"a","level":"info","level":"error","k":1,"k":2}"#)
                .unwrap();
        assert_eq!(args.level, "error");
        assert_eq!(args.key_values.len(), 2);
        assert_eq!(args.get("k"), Some("1"));
    }

    #[test]
    fn test_custom_time_field() {
        let record = br#"{"ts":"x","time":"kept"}"#;
        let args = FormatterArgs::parse_with(record, "ts").unwrap();
        assert_eq!(args.time, "x");
        assert_eq!(args.get("time"), Some("kept"));
        assert!(FormatterArgs::parse(br#"{"ts":"x"}"#).is_none());
    }

    #[test]
    fn test_msg_alias() {
        let args = FormatterArgs::parse(br#"{"time":"t","msg":"short"}"#).unwrap();
        assert_eq!(args.message, "short");
    }

    #[test]
    fn test_escaped_html_characters() {
        let args = FormatterArgs::parse(br#"{"time":"t","h":"<b> 'q'"}"#).unwrap();
        assert_eq!(args.get("h"), Some("<b> 'q'"));
    }

    #[test]
    fn test_rejects_unstructured() {
        let cases: [&[u8]; 10] = [
            b"",
            b"not json",
            b"{\"level\":\"info\"}",
            b"{\"time\":\"\"}",
            b"{\"time\":\"t\"",
            b"{\"time\":\"t\",}",
            b"{\"time\":\"t\"} trailing",
            b"{\"time\":\"t\",\"o\":{\"a\":1}",
            b"{\"time\":tru}",
            b"{\"time\":\"t\",\"s\":\"\xff\"}",
        ];
        for case in cases {
            assert!(FormatterArgs::parse(case).is_none(), "{:?}", case);
        }
    }
}
