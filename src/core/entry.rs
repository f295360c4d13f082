//! Entry encoder
//!
//! An [`Entry`] is one log record under construction. Every field method
//! appends `,"key":<value>` to the entry's private buffer and returns the
//! entry for chaining. A disabled entry carries no buffer, and every method
//! on it returns immediately, so chained calls are always safe.
//!
//! The record is finalized by [`Entry::msg`], [`Entry::msgf`] or
//! [`Entry::msgs`], which close the object, hand the bytes to the writer and
//! return the buffer to the pool.

use super::buffer_pool;
use super::caller::{self, CallerMode};
use super::error::{LoggerError, Result};
use super::escape::{append_escaped, append_escaped_str, escape_sequence};
use super::level::Level;
use super::number::{append_duration, append_f32, append_f64, append_int};
use super::object::{Context, ObjectMarshaler};
use super::text::{append_fmt, append_fmt_or_marker, FORMAT_ERROR};
use super::timestamp::TimeFormat;
use super::value::{JsonMarshaler, MacAddr, Value};
use super::writer::Writer;
use chrono::{DateTime, TimeDelta, TimeZone};
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};

const HEX: &[u8; 16] = b"0123456789abcdef";

static TERMINATION_SUPPRESSED: AtomicBool = AtomicBool::new(false);

/// Stop fatal entries from exiting the process and panic entries from
/// panicking after they are written.
///
/// Meant for test harnesses. The switch is process-wide and starts off.
pub fn set_termination_suppressed(suppressed: bool) {
    TERMINATION_SUPPRESSED.store(suppressed, Ordering::SeqCst);
}

pub fn termination_suppressed() -> bool {
    TERMINATION_SUPPRESSED.load(Ordering::SeqCst)
}

struct Inner<'a> {
    buf: Vec<u8>,
    level: Level,
    writer: Option<&'a dyn Writer>,
}

/// A log record being built. See the [module docs](self).
pub struct Entry<'a> {
    inner: Option<Inner<'a>>,
}

impl<'a> Entry<'a> {
    /// Entry whose buffer already holds the record header (starting with `{`).
    pub(crate) fn with_header(level: Level, writer: &'a dyn Writer, buf: Vec<u8>) -> Self {
        Self {
            inner: Some(Inner {
                buf,
                level,
                writer: Some(writer),
            }),
        }
    }

    /// An entry on which every method is a no-op.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Start building contextual fields. Finish with [`Entry::value`].
    pub fn new_context() -> Entry<'static> {
        Entry {
            inner: Some(Inner {
                buf: Vec::new(),
                level: Level::default(),
                writer: None,
            }),
        }
    }

    /// False when the entry was filtered out by level.
    pub fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Level of the record; the default level for a disabled entry.
    pub fn level(&self) -> Level {
        self.inner.as_ref().map_or(Level::default(), |inner| inner.level)
    }

    /// Bytes encoded so far. Inside [`Writer::write_entry`] this is the full
    /// wire record.
    pub fn bytes(&self) -> &[u8] {
        self.inner.as_ref().map_or(&[], |inner| inner.buf.as_slice())
    }

    #[inline]
    fn field(mut self, key: &str, f: impl FnOnce(&mut Vec<u8>)) -> Self {
        if let Some(inner) = self.inner.as_mut() {
            append_key(&mut inner.buf, key);
            f(&mut inner.buf);
        }
        self
    }

    #[inline]
    fn array<T>(self, key: &str, items: &[T], f: impl Fn(&mut Vec<u8>, &T)) -> Self {
        self.field(key, |buf| {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i != 0 {
                    buf.push(b',');
                }
                f(buf, item);
            }
            buf.push(b']');
        })
    }

    /// Add `key` with a string value.
    pub fn str(self, key: &str, val: &str) -> Self {
        self.field(key, |buf| append_quoted(buf, val.as_bytes()))
    }

    /// Add `key` with an integer rendered as a JSON string.
    pub fn str_int(self, key: &str, val: i64) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            append_int(buf, val);
            buf.push(b'"');
        })
    }

    pub fn strs<S: AsRef<str>>(self, key: &str, vals: &[S]) -> Self {
        self.array(key, vals, |buf, s| append_quoted(buf, s.as_ref().as_bytes()))
    }

    pub fn bool(self, key: &str, b: bool) -> Self {
        self.field(key, |buf| append_bool(buf, b))
    }

    pub fn bools(self, key: &str, vals: &[bool]) -> Self {
        self.array(key, vals, |buf, &b| append_bool(buf, b))
    }

    pub fn float32(self, key: &str, f: f32) -> Self {
        self.field(key, |buf| append_f32(buf, f))
    }

    pub fn float64(self, key: &str, f: f64) -> Self {
        self.field(key, |buf| append_f64(buf, f))
    }

    pub fn floats32(self, key: &str, vals: &[f32]) -> Self {
        self.array(key, vals, |buf, &f| append_f32(buf, f))
    }

    pub fn floats64(self, key: &str, vals: &[f64]) -> Self {
        self.array(key, vals, |buf, &f| append_f64(buf, f))
    }

    /// Add `key` with a duration in milliseconds, e.g. `1500.1`.
    pub fn dur(self, key: &str, d: impl Into<DurationValue>) -> Self {
        let d = d.into().0;
        self.field(key, |buf| append_duration(buf, d))
    }

    pub fn durs(self, key: &str, vals: &[TimeDelta]) -> Self {
        self.array(key, vals, |buf, &d| append_duration(buf, d))
    }

    /// Add `key` with the time elapsed from `start` to `t`, or 0 when `t`
    /// is not after `start`.
    pub fn time_diff<Tz: TimeZone, Tz2: TimeZone>(
        self,
        key: &str,
        t: &DateTime<Tz>,
        start: &DateTime<Tz2>,
    ) -> Self {
        let d = t.clone().signed_duration_since(start.clone());
        let d = if d > TimeDelta::zero() { d } else { TimeDelta::zero() };
        self.field(key, |buf| append_duration(buf, d))
    }

    /// Add `key` with `t` in RFC 3339 form with up to millisecond precision.
    pub fn time<Tz>(self, key: &str, t: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.field(key, |buf| TimeFormat::Rfc3339Millis.append(buf, t))
    }

    pub fn time_format<Tz>(self, key: &str, format: &TimeFormat, t: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.field(key, |buf| format.append(buf, t))
    }

    pub fn times<Tz>(self, key: &str, format: &TimeFormat, vals: &[DateTime<Tz>]) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.array(key, vals, |buf, t| format.append(buf, t))
    }

    /// Add `key` with a single byte as a one character string.
    pub fn byte(self, key: &str, val: u8) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            match escape_sequence(val) {
                Some(seq) => buf.extend_from_slice(seq),
                None => {
                    let mut utf8 = [0u8; 2];
                    buf.extend_from_slice(char::from(val).encode_utf8(&mut utf8).as_bytes());
                }
            }
            buf.push(b'"');
        })
    }

    /// Add `key` with raw bytes as an escaped string.
    pub fn bytes_field(self, key: &str, val: &[u8]) -> Self {
        self.field(key, |buf| append_quoted(buf, val))
    }

    pub fn bytes_or_nil(self, key: &str, val: Option<&[u8]>) -> Self {
        self.field(key, |buf| match val {
            Some(val) => append_quoted(buf, val),
            None => buf.extend_from_slice(b"null"),
        })
    }

    /// Add `key` with `val` as lowercase hex.
    pub fn hex(self, key: &str, val: &[u8]) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            for &b in val {
                buf.push(HEX[(b >> 4) as usize]);
                buf.push(HEX[(b & 0x0f) as usize]);
            }
            buf.push(b'"');
        })
    }

    /// Add `key` with `val` run through a caller supplied encoder (base64,
    /// base32, ...). The encoder output must not need JSON escaping.
    pub fn encode(self, key: &str, val: &[u8], encoder: impl FnOnce(&mut Vec<u8>, &[u8])) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            encoder(buf, val);
            buf.push(b'"');
        })
    }

    /// Add already encoded JSON under `key`, copied verbatim.
    pub fn raw_json(self, key: &str, val: &[u8]) -> Self {
        self.field(key, |buf| buf.extend_from_slice(val))
    }

    pub fn raw_json_str(self, key: &str, val: &str) -> Self {
        self.raw_json(key, val.as_bytes())
    }

    /// Add `key` with the `Display` text of `val`, or `null`.
    pub fn stringer(self, key: &str, val: Option<&dyn fmt::Display>) -> Self {
        self.field(key, |buf| match val {
            Some(val) => {
                buf.push(b'"');
                append_display(buf, val);
                buf.push(b'"');
            }
            None => buf.extend_from_slice(b"null"),
        })
    }

    /// Add `key` with the `Debug` text of `val`.
    pub fn debug_value(self, key: &str, val: &dyn fmt::Debug) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            let mut scratch = buffer_pool::global().scoped();
            let text: &mut Vec<u8> = &mut scratch;
            append_fmt_or_marker(text, format_args!("{:?}", val));
            append_escaped(buf, text);
            buf.push(b'"');
        })
    }

    /// Add `key` with the type name of `val`.
    pub fn type_name<T: ?Sized>(self, key: &str, _val: &T) -> Self {
        self.str(key, std::any::type_name::<T>())
    }

    /// Add `key` with an IP address. IPv4-mapped IPv6 addresses print as IPv4.
    pub fn ip_addr(self, key: &str, ip: IpAddr) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            append_ip(buf, ip);
            buf.push(b'"');
        })
    }

    pub fn ip_addrs(self, key: &str, ips: &[IpAddr]) -> Self {
        self.array(key, ips, |buf, &ip| {
            buf.push(b'"');
            append_ip(buf, ip);
            buf.push(b'"');
        })
    }

    /// Add `key` with `addr/len`.
    pub fn ip_prefix(self, key: &str, addr: IpAddr, len: u8) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            append_ip(buf, addr);
            buf.push(b'/');
            append_int(buf, len);
            buf.push(b'"');
        })
    }

    pub fn socket_addr(self, key: &str, addr: SocketAddr) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            let _ = append_fmt(buf, format_args!("{}", addr));
            buf.push(b'"');
        })
    }

    /// Add `key` with a hardware address as `aa:bb:cc:...`.
    pub fn mac_addr(self, key: &str, addr: &[u8]) -> Self {
        self.field(key, |buf| {
            buf.push(b'"');
            for (i, &b) in addr.iter().enumerate() {
                if i > 0 {
                    buf.push(b':');
                }
                buf.push(HEX[(b >> 4) as usize]);
                buf.push(HEX[(b & 0x0f) as usize]);
            }
            buf.push(b'"');
        })
    }

    /// Add the field `error`.
    pub fn err(self, err: Option<&dyn Error>) -> Self {
        self.an_err("error", err)
    }

    /// Add `key` with the error message, or `null`.
    pub fn an_err(self, key: &str, err: Option<&dyn Error>) -> Self {
        self.field(key, |buf| append_error(buf, err))
    }

    pub fn errs(self, key: &str, errs: &[Option<&dyn Error>]) -> Self {
        self.array(key, errs, |buf, &err| append_error(buf, err))
    }

    /// Add `key` with `obj` encoded as a nested object.
    ///
    /// The members are encoded in place: the leading comma of the first
    /// member is overwritten with `{` afterwards. An object that writes no
    /// members is encoded as `null`.
    pub fn object<O: ObjectMarshaler + ?Sized>(mut self, key: &str, obj: &O) -> Self {
        let start = match self.inner.as_mut() {
            Some(inner) => {
                append_key(&mut inner.buf, key);
                inner.buf.len()
            }
            None => return self,
        };
        self = obj.marshal_object(self);
        self.close_object(start)
    }

    fn close_object(mut self, start: usize) -> Self {
        if let Some(inner) = self.inner.as_mut() {
            if inner.buf.len() > start {
                inner.buf[start] = b'{';
                inner.buf.push(b'}');
            } else {
                inner.buf.extend_from_slice(b"null");
            }
        }
        self
    }

    /// Add `key` with an array of nested objects.
    pub fn objects<O: ObjectMarshaler>(mut self, key: &str, objs: &[O]) -> Self {
        match self.inner.as_mut() {
            Some(inner) => {
                append_key(&mut inner.buf, key);
                inner.buf.push(b'[');
            }
            None => return self,
        }
        for (i, obj) in objs.iter().enumerate() {
            let start = match self.inner.as_mut() {
                Some(inner) => {
                    if i != 0 {
                        inner.buf.push(b',');
                    }
                    inner.buf.len()
                }
                None => return self,
            };
            self = obj.marshal_object(self).close_object(start);
        }
        if let Some(inner) = self.inner.as_mut() {
            inner.buf.push(b']');
        }
        self
    }

    /// Append the members of `obj` directly to this record.
    pub fn embed_object<O: ObjectMarshaler + ?Sized>(self, obj: &O) -> Self {
        if !self.enabled() {
            return self;
        }
        obj.marshal_object(self)
    }

    /// Add `key` with the fields of `ctx` as a nested object.
    pub fn dict(self, key: &str, ctx: &Context) -> Self {
        self.field(key, |buf| {
            buf.push(b'{');
            if let Some(fields) = ctx.as_bytes().get(1..) {
                buf.extend_from_slice(fields);
            }
            buf.push(b'}');
        })
    }

    /// Splice the fields of `ctx` into this record.
    pub fn context(mut self, ctx: &Context) -> Self {
        if let Some(inner) = self.inner.as_mut() {
            inner.buf.extend_from_slice(ctx.as_bytes());
        }
        self
    }

    /// Run `f` only when the entry is enabled.
    pub fn func(self, f: impl FnOnce(Self) -> Self) -> Self {
        if self.enabled() {
            f(self)
        } else {
            self
        }
    }

    /// Add `caller` (and `goid`) for the location this method is called from.
    #[track_caller]
    pub fn caller(self, mode: CallerMode) -> Self {
        self.caller_at(Location::caller(), mode, None)
    }

    /// Add `caller`, an optional `callerfunc`, and `goid` for `location`.
    pub fn caller_at(
        mut self,
        location: &'static Location<'static>,
        mode: CallerMode,
        func: Option<&str>,
    ) -> Self {
        if mode == CallerMode::Off {
            return self;
        }
        if let Some(inner) = self.inner.as_mut() {
            let buf = &mut inner.buf;
            let (file, line) = caller::location_text(location, mode);
            buf.extend_from_slice(b",\"caller\":\"");
            append_escaped_str(buf, file);
            buf.push(b':');
            append_int(buf, line);
            buf.push(b'"');
            if let Some(func) = func {
                buf.extend_from_slice(b",\"callerfunc\":\"");
                append_escaped_str(buf, func);
                buf.push(b'"');
            }
            buf.extend_from_slice(b",\"goid\":");
            append_int(buf, caller::thread_id());
        }
        self
    }

    /// Add `stack` with a backtrace of the current thread.
    pub fn stack(mut self) -> Self {
        if let Some(inner) = self.inner.as_mut() {
            let trace = Backtrace::force_capture();
            inner.buf.extend_from_slice(b",\"stack\":");
            let mut scratch = buffer_pool::global().scoped();
            let text: &mut Vec<u8> = &mut scratch;
            append_fmt_or_marker(text, format_args!("{}", trace));
            append_quoted(&mut inner.buf, text);
        }
        self
    }

    /// Add `key` with a value of any supported category.
    ///
    /// `None` and [`Value::Null`] encode as `null`.
    pub fn any<'v>(self, key: &str, value: impl Into<Value<'v>>) -> Self {
        match value.into() {
            Value::Null => self.field(key, |buf| buf.extend_from_slice(b"null")),
            Value::Object(obj) => self.object(key, obj),
            Value::Context(ctx) => self.dict(key, ctx),
            Value::Durations(ds) => self.durs(key, ds),
            Value::Duration(d) => self.dur(key, d),
            Value::Time(t) => self.time(key, &t),
            Value::MacAddr(MacAddr(addr)) => self.mac_addr(key, &addr),
            Value::Ip(ip) => self.ip_addr(key, ip),
            Value::IpPrefix(p) => self.ip_prefix(key, p.addr, p.len),
            Value::SocketAddr(addr) => self.socket_addr(key, addr),
            Value::RawJson(raw) => self.raw_json(key, raw.0),
            Value::Bools(bs) => self.bools(key, bs),
            Value::Bytes(bs) => self.bytes_field(key, bs),
            Value::Floats32(fs) => self.floats32(key, fs),
            Value::Floats64(fs) => self.floats64(key, fs),
            Value::Strs(ss) => self.strs(key, ss),
            Value::Strings(ss) => self.strs(key, ss),
            Value::Errors(errs) => self.errs(key, errs),
            Value::Str(s) => self.str(key, s),
            Value::Bool(b) => self.bool(key, b),
            Value::Error(err) => self.an_err(key, Some(err)),
            Value::F32(f) => self.float32(key, f),
            Value::F64(f) => self.float64(key, f),
            Value::I8(i) => self.int8(key, i),
            Value::I16(i) => self.int16(key, i),
            Value::I32(i) => self.int32(key, i),
            Value::I64(i) => self.int64(key, i),
            Value::U8(i) => self.uint8(key, i),
            Value::U16(i) => self.uint16(key, i),
            Value::U32(i) => self.uint32(key, i),
            Value::U64(i) => self.uint64(key, i),
            Value::Debug(v) => self.debug_value(key, v),
            Value::Display(v) => self.stringer(key, Some(v)),
            Value::Json(v) => self.field(key, |buf| append_json(buf, v)),
        }
    }

    /// Add `key` with `val` serialized by `serde_json`.
    ///
    /// A serialization failure is recorded as the string
    /// `"marshaling error: ..."` instead.
    pub fn interface<T: serde::Serialize>(self, key: &str, val: &T) -> Self {
        self.field(key, |buf| append_json(buf, val))
    }

    /// Add each pair in order.
    pub fn fields<'v, I>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'v str, Value<'v>)>,
    {
        if !self.enabled() {
            return self;
        }
        fields
            .into_iter()
            .fold(self, |entry, (key, value)| entry.any(key, value))
    }

    /// Add alternating keys and values. A key that is not a string is
    /// recorded as an empty key; a trailing key without a value is ignored.
    pub fn keys_and_values<'v>(self, kvs: impl IntoIterator<Item = Value<'v>>) -> Self {
        if !self.enabled() {
            return self;
        }
        let mut entry = self;
        let mut key: Option<&'v str> = None;
        let mut expect_key = true;
        for v in kvs {
            if expect_key {
                key = match v {
                    Value::Str(k) => Some(k),
                    _ => None,
                };
            } else {
                entry = entry.any(key.unwrap_or(""), v);
            }
            expect_key = !expect_key;
        }
        entry
    }

    /// Disable the entry; a following `msg` writes nothing.
    #[must_use]
    pub fn discard(self) -> Self {
        // dropping `self` returns its buffer to the pool
        Entry::disabled()
    }

    /// Take the encoded fields as a [`Context`].
    pub fn value(mut self) -> Context {
        match self.inner.take() {
            Some(inner) => Context::from_bytes(inner.buf),
            None => Context::default(),
        }
    }

    /// Finish the record with `message` (omitted when empty) and write it.
    ///
    /// A writer error is reported on stderr; use [`Entry::try_msg`] to
    /// handle it instead. After the write, a fatal entry exits the process
    /// and a panic entry panics with the message, unless
    /// [`set_termination_suppressed`] is on.
    pub fn msg(self, msg: &str) {
        if let Err(err) = self.try_msg(msg) {
            report_write_error(&err);
        }
    }

    /// Like [`Entry::msg`] but returns the writer's result.
    pub fn try_msg(mut self, msg: &str) -> Result<usize> {
        if let Some(inner) = self.inner.as_mut() {
            append_message(&mut inner.buf, msg.as_bytes());
        }
        self.finish(msg.as_bytes())
    }

    /// Finish the record with a formatted message.
    ///
    /// ```
    /// # use zlog::core::Entry;
    /// # fn demo(e: Entry<'_>) {
    /// e.msgf(format_args!("{} items", 3));
    /// # }
    /// ```
    pub fn msgf(mut self, args: fmt::Arguments<'_>) {
        if !self.enabled() {
            return;
        }
        let mut scratch = buffer_pool::global().scoped();
        let text: &mut Vec<u8> = &mut scratch;
        append_fmt_or_marker(text, args);
        if let Some(inner) = self.inner.as_mut() {
            append_message(&mut inner.buf, text);
        }
        if let Err(err) = self.finish(text) {
            report_write_error(&err);
        }
    }

    /// Finish the record with the `Display` text of `parts` joined by spaces.
    pub fn msgs(mut self, parts: &[&dyn fmt::Display]) {
        if !self.enabled() {
            return;
        }
        let mut scratch = buffer_pool::global().scoped();
        let text: &mut Vec<u8> = &mut scratch;
        for (i, part) in parts.iter().enumerate() {
            if i != 0 {
                text.push(b' ');
            }
            if append_fmt(text, format_args!("{}", part)).is_err() {
                text.clear();
                text.extend_from_slice(FORMAT_ERROR);
                break;
            }
        }
        if let Some(inner) = self.inner.as_mut() {
            append_message(&mut inner.buf, text);
        }
        if let Err(err) = self.finish(text) {
            report_write_error(&err);
        }
    }

    fn finish(mut self, message: &[u8]) -> Result<usize> {
        let (level, writer) = match self.inner.as_mut() {
            Some(inner) => {
                inner.buf.extend_from_slice(b"}\n");
                (inner.level, inner.writer)
            }
            None => return Ok(0),
        };

        let result = match writer {
            Some(writer) => writer.write_entry(&self),
            None => Err(LoggerError::writer("entry has no writer attached")),
        };
        drop(self);

        if level.is_terminal() && !termination_suppressed() {
            if level == Level::Fatal {
                std::process::exit(255);
            }
            panic!("{}", String::from_utf8_lossy(message));
        }
        result
    }
}

impl Drop for Entry<'_> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            buffer_pool::global().put(inner.buf);
        }
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("enabled", &self.enabled())
            .field("level", &self.level())
            .field("bytes", &String::from_utf8_lossy(self.bytes()))
            .finish()
    }
}

macro_rules! integer_fields {
    ($($name:ident, $names:ident: $t:ty;)*) => {
        impl<'a> Entry<'a> {
            $(
                #[doc = concat!("Add `key` with an `", stringify!($t), "` value.")]
                pub fn $name(self, key: &str, i: $t) -> Self {
                    self.field(key, |buf| append_int(buf, i))
                }

                #[doc = concat!("Add `key` with an array of `", stringify!($t), "` values.")]
                pub fn $names(self, key: &str, vals: &[$t]) -> Self {
                    self.array(key, vals, |buf, &i| append_int(buf, i))
                }
            )*
        }
    };
}

integer_fields! {
    int, ints: isize;
    int8, ints8: i8;
    int16, ints16: i16;
    int32, ints32: i32;
    int64, ints64: i64;
    uint, uints: usize;
    uint8, uints8: u8;
    uint16, uints16: u16;
    uint32, uints32: u32;
    uint64, uints64: u64;
}

/// Accepts both signed chrono deltas and std durations in [`Entry::dur`].
pub struct DurationValue(TimeDelta);

impl From<TimeDelta> for DurationValue {
    fn from(d: TimeDelta) -> Self {
        DurationValue(d)
    }
}

impl From<std::time::Duration> for DurationValue {
    fn from(d: std::time::Duration) -> Self {
        DurationValue(super::number::from_std(d))
    }
}

#[inline]
fn append_key(buf: &mut Vec<u8>, key: &str) {
    buf.extend_from_slice(b",\"");
    append_escaped_str(buf, key);
    buf.extend_from_slice(b"\":");
}

#[inline]
fn append_quoted(buf: &mut Vec<u8>, val: &[u8]) {
    buf.push(b'"');
    append_escaped(buf, val);
    buf.push(b'"');
}

#[inline]
fn append_bool(buf: &mut Vec<u8>, b: bool) {
    buf.extend_from_slice(if b { b"true" } else { b"false" });
}

fn append_message(buf: &mut Vec<u8>, msg: &[u8]) {
    if msg.is_empty() {
        return;
    }
    buf.extend_from_slice(b",\"message\":");
    append_quoted(buf, msg);
}

fn append_ip(buf: &mut Vec<u8>, ip: IpAddr) {
    let _ = match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => append_fmt(buf, format_args!("{}", v4)),
            None => append_fmt(buf, format_args!("{}", v6)),
        },
        IpAddr::V4(v4) => append_fmt(buf, format_args!("{}", v4)),
    };
}

fn append_display(buf: &mut Vec<u8>, val: &dyn fmt::Display) {
    let mut scratch = buffer_pool::global().scoped();
    let text: &mut Vec<u8> = &mut scratch;
    append_fmt_or_marker(text, format_args!("{}", val));
    append_escaped(buf, text);
}

fn append_error(buf: &mut Vec<u8>, err: Option<&dyn Error>) {
    match err {
        Some(err) => {
            buf.push(b'"');
            append_display(buf, &err);
            buf.push(b'"');
        }
        None => buf.extend_from_slice(b"null"),
    }
}

fn append_json(buf: &mut Vec<u8>, val: &dyn JsonMarshaler) {
    let mut scratch = buffer_pool::global().scoped();
    let text: &mut Vec<u8> = &mut scratch;
    match val.marshal_json(text) {
        Ok(()) => buf.extend_from_slice(text),
        Err(err) => {
            text.clear();
            append_fmt_or_marker(text, format_args!("marshaling error: {}", err));
            append_quoted(buf, text);
        }
    }
}

fn report_write_error(err: &LoggerError) {
    eprintln!("[LOGGER ERROR] Failed to write log entry: {}", err);
}
