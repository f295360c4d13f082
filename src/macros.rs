//! Logging macros for ergonomic log message formatting.
//!
//! Each macro starts an entry at its level and finishes it with a
//! `format!`-style message. Nothing is formatted when the level is disabled.
//!
//! # Examples
//!
//! ```
//! use zlog::prelude::*;
//! use zlog::info;
//!
//! let logger = Logger::default();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at an explicit level.
///
/// # Examples
///
/// ```
/// # use zlog::prelude::*;
/// # let logger = Logger::default();
/// use zlog::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level).msgf(format_args!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use zlog::prelude::*;
/// # let logger = Logger::default();
/// use zlog::warn;
/// warn!(logger, "Memory usage high: {}%", 85);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Level, Logger};
    use crate::writers::IoWriter;
    use std::sync::Arc;

    #[test]
    fn test_macros_format_message() {
        let sink = Arc::new(IoWriter::new(Vec::new()));
        let logger = Logger::builder()
            .level(Level::Debug)
            .writer(Arc::clone(&sink))
            .build();

        trace!(logger, "hidden {}", 0);
        debug!(logger, "value: {}", 42);
        info!(logger, "plain");
        warn!(logger, "{}% used", 85);
        error!(logger, "code {code}", code = 500);
        log!(logger, Level::Info, "{:>3}", 7);

        let text = sink.with_inner(|buf| String::from_utf8(buf.clone()).unwrap());
        let messages: Vec<String> = text
            .lines()
            .map(|line| {
                let json: serde_json::Value = serde_json::from_str(line).unwrap();
                json["message"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(messages, ["value: 42", "plain", "85% used", "code 500", "  7"]);
    }
}
