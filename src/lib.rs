//! # zlog
//!
//! A structured logger that encodes each record straight into a pooled byte
//! buffer as one line of JSON, plus writers that re-render those records
//! for humans (console) or line tooling (logfmt).
//!
//! ## Features
//!
//! - **Zero allocation on the hot path**: fields are appended to a reused buffer
//! - **Typed fields**: integers, floats, durations, times, addresses, errors,
//!   nested objects and a generic `any`
//! - **Reformatting writers**: colorized console output and logfmt
//! - **Thread safe**: loggers are `Send + Sync`, records never interleave
//!
//! ```
//! use zlog::prelude::*;
//!
//! let logger = Logger::builder()
//!     .writer(ConsoleWriter::new().color_output(false))
//!     .build();
//! logger
//!     .info()
//!     .str("user", "ann")
//!     .dur("elapsed", std::time::Duration::from_micros(1500))
//!     .msg("login");
//! ```

pub mod core;
pub mod formatter;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        CallerMode, Config, Context, Encoding, Entry, GeneralLogger, Level, Logger,
        LoggerBuilder, LoggerError, ObjectMarshaler, Result, TimeFormat, Value, Writer,
    };
    pub use crate::formatter::{FormatterArgs, LogfmtFormatter};
    pub use crate::writers::{ConsoleWriter, IoWriter};
}

pub use crate::core::{
    set_termination_suppressed, CallerMode, Config, Context, Encoding, Entry, GeneralLogger,
    Level, Logger, LoggerBuilder, LoggerError, ObjectMarshaler, Result, TimeFormat, Value, Writer,
};
pub use crate::formatter::{FormatterArgs, KeyValue, LogfmtFormatter, ValueType};
pub use crate::writers::{ConsoleWriter, IoWriter};
