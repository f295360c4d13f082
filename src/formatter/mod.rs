//! Re-rendering of wire records
//!
//! [`FormatterArgs`] recovers the fields of one JSON record; the renderers in
//! this module and in [`crate::writers::ConsoleWriter`] turn them into text.

pub mod args;
pub mod logfmt;

pub use args::{FormatterArgs, KeyValue, ValueType};
pub use logfmt::LogfmtFormatter;

use std::io;
use std::sync::Arc;

/// Custom render hook for [`crate::writers::ConsoleWriter`].
///
/// Receives the parsed record and the output stream, and returns the number
/// of bytes written.
pub type FormatterFn =
    Arc<dyn Fn(&mut dyn io::Write, &FormatterArgs<'_>) -> io::Result<usize> + Send + Sync>;
