//! Human readable console writer
//!
//! Default layout:
//!
//! ```text
//! {time} {LVL} {goid} {caller} > {message} {key}={value} {key}={value}
//! ```
//!
//! Records that cannot be parsed are written through unchanged.

use crate::core::{buffer_pool, Entry, Level, LoggerError, Result, Writer};
use crate::formatter::{FormatterArgs, FormatterFn, KeyValue, ValueType};
use colored::Color;
use parking_lot::Mutex;
use std::io::{self, IsTerminal, Write};

const RESET: &str = "\x1b[0m";

/// Re-renders JSON records for terminals.
///
/// Parsing every record is much slower than writing it raw; keep this
/// writer for development and interactive tools.
pub struct ConsoleWriter {
    color_output: bool,
    quote_string: bool,
    end_with_message: bool,
    time_field: String,
    formatter: Option<FormatterFn>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleWriter {
    /// Writer to stderr, colorized when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            color_output: io::stderr().is_terminal(),
            quote_string: false,
            end_with_message: false,
            time_field: crate::core::logger::DEFAULT_TIME_FIELD.to_string(),
            formatter: None,
            out: Mutex::new(Box::new(io::stderr())),
        }
    }

    #[must_use]
    pub fn color_output(mut self, enabled: bool) -> Self {
        self.color_output = enabled;
        self
    }

    /// Quote string values in the key/value section.
    ///
    /// Quoting uses Rust `Debug` escapes, so a control byte such as 0x01
    /// renders as `\u{1}`.
    #[must_use]
    pub fn quote_string(mut self, enabled: bool) -> Self {
        self.quote_string = enabled;
        self
    }

    /// Put the message after the key/value pairs.
    #[must_use]
    pub fn end_with_message(mut self, enabled: bool) -> Self {
        self.end_with_message = enabled;
        self
    }

    /// Name of the timestamp field in incoming records.
    #[must_use]
    pub fn time_field(mut self, field: impl Into<String>) -> Self {
        self.time_field = field.into();
        self
    }

    /// Replace the built-in layout. Color and quoting options are ignored
    /// while a formatter is set.
    #[must_use]
    pub fn formatter(mut self, formatter: FormatterFn) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Send output to `out` instead of stderr.
    #[must_use]
    pub fn writer<W: Write + Send + 'static>(mut self, out: W) -> Self {
        self.out = Mutex::new(Box::new(out));
        self
    }

    /// Render one wire record, or pass it through when it is not structured.
    pub fn write_record(&self, record: &[u8]) -> io::Result<usize> {
        let mut out = self.out.lock();
        let out: &mut dyn Write = &mut **out;
        match FormatterArgs::parse_with(record, &self.time_field) {
            None => {
                out.write_all(record)?;
                Ok(record.len())
            }
            Some(args) => match &self.formatter {
                Some(formatter) => formatter(out, &args),
                None => self.format(out, &args),
            },
        }
    }

    /// The built-in layout.
    pub fn format(&self, out: &mut dyn Write, args: &FormatterArgs<'_>) -> io::Result<usize> {
        let mut buf = buffer_pool::global().scoped();
        let b: &mut Vec<u8> = &mut buf;

        let level = args.level.parse::<Level>().ok();
        let three = level.map_or("???", |l| l.three_letter());

        if self.color_output {
            let color = level.map_or(Color::BrightBlack, |l| l.color_code());
            let gray = fg(Color::BrightBlack);
            let cyan = fg(Color::Cyan);

            write!(b, "{}{}{} {}{}{} ", gray, args.time, RESET, fg(color), three, RESET)?;
            if args.caller.is_empty() {
                write!(b, "{}>{}", cyan, RESET)?;
            } else {
                write!(b, "{} {} {}>{}", args.goid, args.caller, cyan, RESET)?;
            }
            if !self.end_with_message {
                write!(b, " {}", args.message)?;
            }
            for kv in &args.key_values {
                if kv.key == "error" && kv.value != "null" {
                    write!(b, " {}{}=", fg(Color::BrightRed), kv.key)?;
                } else {
                    write!(b, " {}{}={}", fg(Color::BrightBlue), kv.key, fg(Color::BrightCyan))?;
                }
                self.write_value(b, kv)?;
                b.extend_from_slice(RESET.as_bytes());
            }
            if self.end_with_message {
                write!(b, "{} {}", RESET, args.message)?;
            }
        } else {
            write!(b, "{} {} ", args.time, three)?;
            if args.caller.is_empty() {
                b.push(b'>');
            } else {
                write!(b, "{} {} >", args.goid, args.caller)?;
            }
            if !self.end_with_message {
                write!(b, " {}", args.message)?;
            }
            for kv in &args.key_values {
                write!(b, " {}=", kv.key)?;
                self.write_value(b, kv)?;
            }
            if self.end_with_message {
                write!(b, " {}", args.message)?;
            }
        }

        if b.last() != Some(&b'\n') {
            b.push(b'\n');
        }
        if !args.stack.is_empty() {
            b.extend_from_slice(args.stack.as_bytes());
            if !args.stack.ends_with('\n') {
                b.push(b'\n');
            }
        }

        out.write_all(b)?;
        Ok(b.len())
    }

    fn write_value(&self, b: &mut Vec<u8>, kv: &KeyValue<'_>) -> io::Result<()> {
        if self.quote_string && kv.value_type == ValueType::String {
            write!(b, "{:?}", kv.value)
        } else {
            b.extend_from_slice(kv.value.as_bytes());
            Ok(())
        }
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for ConsoleWriter {
    fn write_entry(&self, entry: &Entry<'_>) -> Result<usize> {
        self.write_record(entry.bytes()).map_err(|e| match self.formatter {
            Some(_) => LoggerError::formatter("custom", e.to_string()),
            None => LoggerError::io_operation("writing", "console", e),
        })
    }

    fn flush(&self) -> Result<()> {
        self.out
            .lock()
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing", "console", e))
    }

    fn name(&self) -> &str {
        "console"
    }
}

fn fg(color: Color) -> String {
    format!("\x1b[{}m", color.to_fg_str())
}
