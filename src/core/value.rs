//! Closed set of value categories accepted by [`Entry::any`]
//!
//! Variants are listed in dispatch priority order. Anything not covered by a
//! dedicated variant goes through [`Value::Json`], which serializes with
//! `serde_json`.
//!
//! [`Entry::any`]: crate::core::Entry::any

use super::object::{Context, ObjectMarshaler};
use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Serialization hook used by the generic fallback.
///
/// Implemented for every `serde::Serialize` type.
pub trait JsonMarshaler {
    fn marshal_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()>;
}

impl<T: Serialize + ?Sized> JsonMarshaler for T {
    fn marshal_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(out, self)
    }
}

/// Hardware (MAC) address, printed as lowercase colon-separated hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddr(pub [u8; 6]);

/// Address plus prefix length, printed as `addr/len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpPrefix {
    pub addr: IpAddr,
    pub len: u8,
}

impl IpPrefix {
    pub fn new(addr: IpAddr, len: u8) -> Self {
        Self { addr, len }
    }
}

/// Already encoded JSON, copied into the record verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawJson<'a>(pub &'a [u8]);

pub enum Value<'a> {
    Null,
    Object(&'a dyn ObjectMarshaler),
    Context(&'a Context),
    Durations(&'a [TimeDelta]),
    Duration(TimeDelta),
    Time(DateTime<FixedOffset>),
    MacAddr(MacAddr),
    Ip(IpAddr),
    IpPrefix(IpPrefix),
    SocketAddr(SocketAddr),
    RawJson(RawJson<'a>),
    Bools(&'a [bool]),
    Bytes(&'a [u8]),
    Floats32(&'a [f32]),
    Floats64(&'a [f64]),
    Strs(&'a [&'a str]),
    Strings(&'a [String]),
    Errors(&'a [Option<&'a dyn Error>]),
    Str(&'a str),
    Bool(bool),
    Error(&'a dyn Error),
    F32(f32),
    F64(f64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Debug(&'a dyn fmt::Debug),
    Display(&'a dyn fmt::Display),
    Json(&'a dyn JsonMarshaler),
}

impl<'a> Value<'a> {
    pub fn object<O: ObjectMarshaler>(obj: &'a O) -> Self {
        Value::Object(obj)
    }

    pub fn error<E: Error>(err: &'a E) -> Self {
        Value::Error(err)
    }

    pub fn debug<D: fmt::Debug>(v: &'a D) -> Self {
        Value::Debug(v)
    }

    pub fn display<D: fmt::Display>(v: &'a D) -> Self {
        Value::Display(v)
    }

    pub fn json<T: Serialize>(v: &'a T) -> Self {
        Value::Json(v)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = match self {
            Value::Null => "Null",
            Value::Object(_) => "Object",
            Value::Context(_) => "Context",
            Value::Durations(_) => "Durations",
            Value::Duration(_) => "Duration",
            Value::Time(_) => "Time",
            Value::MacAddr(_) => "MacAddr",
            Value::Ip(_) => "Ip",
            Value::IpPrefix(_) => "IpPrefix",
            Value::SocketAddr(_) => "SocketAddr",
            Value::RawJson(_) => "RawJson",
            Value::Bools(_) => "Bools",
            Value::Bytes(_) => "Bytes",
            Value::Floats32(_) => "Floats32",
            Value::Floats64(_) => "Floats64",
            Value::Strs(_) => "Strs",
            Value::Strings(_) => "Strings",
            Value::Errors(_) => "Errors",
            Value::Str(_) => "Str",
            Value::Bool(_) => "Bool",
            Value::Error(_) => "Error",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::I8(_) => "I8",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::U8(_) => "U8",
            Value::U16(_) => "U16",
            Value::U32(_) => "U32",
            Value::U64(_) => "U64",
            Value::Debug(_) => "Debug",
            Value::Display(_) => "Display",
            Value::Json(_) => "Json",
        };
        write!(f, "Value::{}", category)
    }
}

/// `None` is encoded as `null`, the same as [`Value::Null`].
impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<'a> From<&'a Context> for Value<'a> {
    fn from(v: &'a Context) -> Self {
        Value::Context(v)
    }
}

impl<'a> From<&'a [TimeDelta]> for Value<'a> {
    fn from(v: &'a [TimeDelta]) -> Self {
        Value::Durations(v)
    }
}

impl From<TimeDelta> for Value<'_> {
    fn from(v: TimeDelta) -> Self {
        Value::Duration(v)
    }
}

impl From<std::time::Duration> for Value<'_> {
    fn from(v: std::time::Duration) -> Self {
        Value::Duration(super::number::from_std(v))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value<'_> {
    fn from(v: DateTime<Tz>) -> Self {
        Value::Time(v.fixed_offset())
    }
}

impl From<MacAddr> for Value<'_> {
    fn from(v: MacAddr) -> Self {
        Value::MacAddr(v)
    }
}

impl From<IpAddr> for Value<'_> {
    fn from(v: IpAddr) -> Self {
        Value::Ip(v)
    }
}

impl From<std::net::Ipv4Addr> for Value<'_> {
    fn from(v: std::net::Ipv4Addr) -> Self {
        Value::Ip(IpAddr::V4(v))
    }
}

impl From<std::net::Ipv6Addr> for Value<'_> {
    fn from(v: std::net::Ipv6Addr) -> Self {
        Value::Ip(IpAddr::V6(v))
    }
}

impl From<IpPrefix> for Value<'_> {
    fn from(v: IpPrefix) -> Self {
        Value::IpPrefix(v)
    }
}

impl From<SocketAddr> for Value<'_> {
    fn from(v: SocketAddr) -> Self {
        Value::SocketAddr(v)
    }
}

impl<'a> From<RawJson<'a>> for Value<'a> {
    fn from(v: RawJson<'a>) -> Self {
        Value::RawJson(v)
    }
}

impl<'a> From<&'a [bool]> for Value<'a> {
    fn from(v: &'a [bool]) -> Self {
        Value::Bools(v)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Bytes(v)
    }
}

impl<'a> From<&'a Vec<u8>> for Value<'a> {
    fn from(v: &'a Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<'a> From<&'a [f32]> for Value<'a> {
    fn from(v: &'a [f32]) -> Self {
        Value::Floats32(v)
    }
}

impl<'a> From<&'a [f64]> for Value<'a> {
    fn from(v: &'a [f64]) -> Self {
        Value::Floats64(v)
    }
}

impl<'a> From<&'a [&'a str]> for Value<'a> {
    fn from(v: &'a [&'a str]) -> Self {
        Value::Strs(v)
    }
}

impl<'a> From<&'a [String]> for Value<'a> {
    fn from(v: &'a [String]) -> Self {
        Value::Strings(v)
    }
}

impl<'a> From<&'a Vec<String>> for Value<'a> {
    fn from(v: &'a Vec<String>) -> Self {
        Value::Strings(v)
    }
}

impl<'a> From<&'a [Option<&'a dyn Error>]> for Value<'a> {
    fn from(v: &'a [Option<&'a dyn Error>]) -> Self {
        Value::Errors(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Str(v)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(v: &'a String) -> Self {
        Value::Str(v)
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value<'_> {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

macro_rules! from_integer {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value<'_> {
                fn from(v: $t) -> Self {
                    Value::$variant(v as _)
                }
            }
        )*
    };
}

from_integer! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => U64,
}
