//! Core logger types and traits

pub mod buffer_pool;
pub mod caller;
pub mod config;
pub mod entry;
pub mod error;
pub mod escape;
pub mod level;
pub mod logger;
pub mod number;
pub mod object;
pub mod text;
pub mod timestamp;
pub mod value;
pub mod writer;

pub use buffer_pool::{BufferPool, PoolMetrics, PooledBuffer};
pub use caller::CallerMode;
pub use config::{Config, Encoding};
pub use entry::{set_termination_suppressed, termination_suppressed, DurationValue, Entry};
pub use error::{LoggerError, Result};
pub use level::Level;
pub use logger::{GeneralLogger, Logger, LoggerBuilder, NamedLogger};
pub use object::{Context, ObjectMarshaler};
pub use timestamp::TimeFormat;
pub use value::{IpPrefix, JsonMarshaler, MacAddr, RawJson, Value};
pub use writer::Writer;
