//! logfmt rendering
//!
//! ```text
//! time=2024-01-02T03:04:05Z level=info goid=1 caller="src/main.rs:9" user="ann" admin n=3 "login"
//! ```

use super::{FormatterArgs, FormatterFn, ValueType};
use crate::core::buffer_pool;
use std::io::{self, Write};
use std::sync::Arc;

/// Renders records as space separated `key=value` pairs.
///
/// String values are quoted, `true` values are written as a bare key and
/// the message closes the line as a quoted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogfmtFormatter {
    time_field: String,
}

impl LogfmtFormatter {
    pub fn new() -> Self {
        Self {
            time_field: crate::core::logger::DEFAULT_TIME_FIELD.to_string(),
        }
    }

    /// Name written for the timestamp pair.
    #[must_use]
    pub fn with_time_field(mut self, field: impl Into<String>) -> Self {
        self.time_field = field.into();
        self
    }

    pub fn time_field(&self) -> &str {
        &self.time_field
    }

    /// Render `args` into `out` as one line.
    pub fn format(&self, out: &mut dyn io::Write, args: &FormatterArgs<'_>) -> io::Result<usize> {
        let mut buf = buffer_pool::global().scoped();
        let b: &mut Vec<u8> = &mut buf;

        write!(b, "{}={} ", self.time_field, args.time)?;
        if !args.level.is_empty() && !args.level.starts_with('?') {
            write!(b, "level={} ", args.level)?;
        }
        if !args.caller.is_empty() {
            write!(b, "goid={} caller={:?} ", args.goid, args.caller)?;
        }
        if !args.stack.is_empty() {
            write!(b, "stack={:?} ", args.stack)?;
        }
        for kv in &args.key_values {
            match kv.value_type {
                ValueType::True => write!(b, "{} ", kv.key)?,
                ValueType::False => write!(b, "{}=false ", kv.key)?,
                ValueType::Number | ValueType::Raw => write!(b, "{}={} ", kv.key, kv.value)?,
                ValueType::String => write!(b, "{}={:?} ", kv.key, kv.value)?,
            }
        }
        writeln!(b, "{:?}", args.message)?;

        out.write_all(b)?;
        Ok(b.len())
    }

    /// Wrap this formatter as a console render hook.
    pub fn into_formatter(self) -> FormatterFn {
        Arc::new(move |out: &mut dyn io::Write, args: &FormatterArgs<'_>| {
            self.format(out, args)
        })
    }
}

impl Default for LogfmtFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(record: &[u8]) -> String {
        let args = FormatterArgs::parse(record).unwrap();
        let mut out = Vec::new();
        let n = LogfmtFormatter::new().format(&mut out, &args).unwrap();
        assert_eq!(n, out.len());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_line() {
        let line = render(
            br#"{"time":"2024-01-02T03:04:05Z","level":"info","caller":"src/main.rs:9","goid":1,"user":"ann","admin":true,"banned":false,"n":3,"o":{"a":1},"message":"login"}"#,
        );
        assert_eq!(
            line,
            "time=2024-01-02T03:04:05Z level=info goid=1 caller=\"src/main.rs:9\" user=\"ann\" admin banned=false n=3 o={\"a\":1} \"login\"\n"
        );
    }

    #[test]
    fn test_minimal_line() {
        assert_eq!(render(br#"{"time":1}"#), "time=1 \"\"\n");
    }

    #[test]
    fn test_unknown_level_omitted() {
        let line = render(br#"{"time":1,"level":"???","message":"x"}"#);
        assert_eq!(line, "time=1 \"x\"\n");
    }

    #[test]
    fn test_stack_and_quoting() {
        let line = render(br#"{"time":1,"stack":"a\nb","s":"say \"hi\"","message":"m"}"#);
        assert_eq!(line, "time=1 stack=\"a\\nb\" s=\"say \\\"hi\\\"\" \"m\"\n");
    }

    #[test]
    fn test_custom_time_field() {
        let args = FormatterArgs::parse_with(br#"{"ts":5}"#, "ts").unwrap();
        let mut out = Vec::new();
        LogfmtFormatter::new()
            .with_time_field("ts")
            .format(&mut out, &args)
            .unwrap();
        assert_eq!(out, b"ts=5 \"\"\n");
    }

    #[test]
    fn test_into_formatter() {
        let hook = LogfmtFormatter::new().into_formatter();
        let args = FormatterArgs::parse(br#"{"time":1,"message":"m"}"#).unwrap();
        let mut out = Vec::new();
        hook(&mut out, &args).unwrap();
        assert_eq!(out, b"time=1 \"m\"\n");
    }
}
