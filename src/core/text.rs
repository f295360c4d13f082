//! Formatting user values into record buffers
//!
//! `io::Write::write_fmt` panics when a `Display` or `Debug` impl returns an
//! error, so values we do not control are formatted through `fmt::Write`
//! instead, where the error comes back to the caller.

use std::fmt;

/// Text written in place of a value whose formatting failed.
pub const FORMAT_ERROR: &[u8] = b"marshaling error: formatting failed";

struct VecWriter<'a>(&'a mut Vec<u8>);

impl fmt::Write for VecWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Append formatted text. On error the bytes written so far stay in `buf`.
pub fn append_fmt(buf: &mut Vec<u8>, args: fmt::Arguments<'_>) -> fmt::Result {
    fmt::write(&mut VecWriter(buf), args)
}

/// Append formatted text, or [`FORMAT_ERROR`] if formatting fails.
pub fn append_fmt_or_marker(buf: &mut Vec<u8>, args: fmt::Arguments<'_>) {
    let start = buf.len();
    if append_fmt(buf, args).is_err() {
        buf.truncate(start);
        buf.extend_from_slice(FORMAT_ERROR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl fmt::Display for Failing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_append_fmt_reports_error() {
        let mut buf = Vec::new();
        assert!(append_fmt(&mut buf, format_args!("{}", Failing)).is_err());
        assert!(append_fmt(&mut buf, format_args!("{}-{}", 1, "a")).is_ok());
    }

    #[test]
    fn test_marker_replaces_partial_output() {
        let mut buf = b"keep:".to_vec();
        append_fmt_or_marker(&mut buf, format_args!("{}", Failing));
        assert_eq!(buf, b"keep:marshaling error: formatting failed");
    }
}
