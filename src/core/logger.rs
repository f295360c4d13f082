//! Main logger implementation

use super::{
    buffer_pool,
    caller::CallerMode,
    entry::Entry,
    error::Result,
    escape::append_escaped_str,
    level::Level,
    object::Context,
    timestamp::TimeFormat,
    writer::Writer,
};
use crate::writers::IoWriter;
use chrono::Local;
use parking_lot::RwLock;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Field name used for the timestamp unless configured otherwise
pub const DEFAULT_TIME_FIELD: &str = "time";

/// Produces [`Entry`] values that share a writer, a level threshold and a
/// set of contextual fields.
///
/// ```
/// use zlog::prelude::*;
///
/// let logger = Logger::builder().level(Level::Debug).build();
/// logger.debug().str("user", "ann").int("attempt", 2).msg("login");
/// ```
pub struct Logger {
    level: RwLock<Level>,
    caller: CallerMode,
    time_field: String,
    time_format: TimeFormat,
    context: Context,
    writer: Arc<dyn Writer>,
}

impl Logger {
    /// Logger at `info` that writes raw JSON records to `writer`.
    #[must_use]
    pub fn new<W: Writer + 'static>(writer: W) -> Self {
        Self {
            level: RwLock::new(Level::Info),
            caller: CallerMode::Off,
            time_field: DEFAULT_TIME_FIELD.to_string(),
            time_format: TimeFormat::default(),
            context: Context::new(),
            writer: Arc::new(writer),
        }
    }

    /// Start an entry at `level`. The entry is disabled when `level` is
    /// below the logger's threshold.
    #[track_caller]
    pub fn log(&self, level: Level) -> Entry<'_> {
        if !self.is_enabled(level) {
            return Entry::disabled();
        }

        let mut buf = buffer_pool::global().get();
        buf.extend_from_slice(b"{\"");
        append_escaped_str(&mut buf, &self.time_field);
        buf.extend_from_slice(b"\":");
        self.time_format.append(&mut buf, &Local::now());
        buf.extend_from_slice(b",\"level\":\"");
        buf.extend_from_slice(level.as_str().as_bytes());
        buf.push(b'"');

        Entry::with_header(level, &*self.writer, buf)
            .caller_at(Location::caller(), self.caller, None)
            .context(&self.context)
    }

    #[track_caller]
    pub fn trace(&self) -> Entry<'_> {
        self.log(Level::Trace)
    }

    #[track_caller]
    pub fn debug(&self) -> Entry<'_> {
        self.log(Level::Debug)
    }

    #[track_caller]
    pub fn info(&self) -> Entry<'_> {
        self.log(Level::Info)
    }

    #[track_caller]
    pub fn warn(&self) -> Entry<'_> {
        self.log(Level::Warn)
    }

    #[track_caller]
    pub fn error(&self) -> Entry<'_> {
        self.log(Level::Error)
    }

    /// Entry that exits the process with status 255 once written.
    #[track_caller]
    pub fn fatal(&self) -> Entry<'_> {
        self.log(Level::Fatal)
    }

    /// Entry that panics with its message once written.
    #[track_caller]
    pub fn panic(&self) -> Entry<'_> {
        self.log(Level::Panic)
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level >= *self.level.read()
    }

    pub fn level(&self) -> Level {
        *self.level.read()
    }

    pub fn set_level(&self, level: Level) {
        *self.level.write() = level;
    }

    /// Contextual fields added to every record.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Child logger whose records also carry the fields in `ctx`.
    #[must_use]
    pub fn with_context(&self, ctx: &Context) -> Logger {
        Logger {
            level: RwLock::new(self.level()),
            caller: self.caller,
            time_field: self.time_field.clone(),
            time_format: self.time_format.clone(),
            context: self.context.merge(ctx),
            writer: Arc::clone(&self.writer),
        }
    }

    /// Child logger whose records carry `"logger":"<name>"`.
    #[must_use]
    pub fn with_name(&self, name: &str) -> Logger {
        self.with_context(&Entry::new_context().str("logger", name).value())
    }

    /// Plain-message facade over a child logger named `name`.
    #[must_use]
    pub fn general(&self, name: &str) -> NamedLogger {
        NamedLogger {
            logger: self.with_name(name),
        }
    }

    pub fn writer(&self) -> &Arc<dyn Writer> {
        &self.writer
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.flush()
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    /// Logger at `info` writing JSON to stderr.
    fn default() -> Self {
        Self::new(IoWriter::stderr())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("caller", &self.caller)
            .field("time_field", &self.time_field)
            .field("time_format", &self.time_format)
            .field("writer", &self.writer.name())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Plain-message logging interface for code that does not build fields.
pub trait GeneralLogger: Send + Sync {
    #[track_caller]
    fn trace(&self, msg: &str);
    #[track_caller]
    fn trace_fmt(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn debug(&self, msg: &str);
    #[track_caller]
    fn debug_fmt(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn info(&self, msg: &str);
    #[track_caller]
    fn info_fmt(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn warn(&self, msg: &str);
    #[track_caller]
    fn warn_fmt(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn error(&self, msg: &str);
    #[track_caller]
    fn error_fmt(&self, args: fmt::Arguments<'_>);
}

/// [`GeneralLogger`] returned by [`Logger::general`].
#[derive(Debug)]
pub struct NamedLogger {
    logger: Logger,
}

impl NamedLogger {
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl GeneralLogger for NamedLogger {
    fn trace(&self, msg: &str) {
        self.logger.trace().msg(msg);
    }

    fn trace_fmt(&self, args: fmt::Arguments<'_>) {
        self.logger.trace().msgf(args);
    }

    fn debug(&self, msg: &str) {
        self.logger.debug().msg(msg);
    }

    fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.logger.debug().msgf(args);
    }

    fn info(&self, msg: &str) {
        self.logger.info().msg(msg);
    }

    fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.logger.info().msgf(args);
    }

    fn warn(&self, msg: &str) {
        self.logger.warn().msg(msg);
    }

    fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.logger.warn().msgf(args);
    }

    fn error(&self, msg: &str) {
        self.logger.error().msg(msg);
    }

    fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.logger.error().msgf(args);
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use zlog::prelude::*;
///
/// let logger = Logger::builder()
///     .level(Level::Debug)
///     .writer(ConsoleWriter::new())
///     .caller(CallerMode::Short)
///     .name("api")
///     .build();
/// logger.info().msg("ready");
/// ```
pub struct LoggerBuilder {
    level: Level,
    writer: Option<Arc<dyn Writer>>,
    caller: CallerMode,
    time_field: String,
    time_format: TimeFormat,
    context: Context,
    name: Option<String>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: Level::Info,
            writer: None,
            caller: CallerMode::Off,
            time_field: DEFAULT_TIME_FIELD.to_string(),
            time_format: TimeFormat::default(),
            context: Context::new(),
            name: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the sink; stderr when not called.
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Writer + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller(mut self, mode: CallerMode) -> Self {
        self.caller = mode;
        self
    }

    /// Field name for the timestamp; an empty name keeps the default.
    #[must_use = "builder methods return a new value"]
    pub fn time_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !field.is_empty() {
            self.time_field = field;
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Add contextual fields; repeated calls accumulate.
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, ctx: &Context) -> Self {
        self.context = self.context.merge(ctx);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut context = self.context;
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            context = Entry::new_context()
                .str("logger", &name)
                .value()
                .merge(&context);
        }

        Logger {
            level: RwLock::new(self.level),
            caller: self.caller,
            time_field: self.time_field,
            time_format: self.time_format,
            context,
            writer: self
                .writer
                .unwrap_or_else(|| Arc::new(IoWriter::stderr())),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
