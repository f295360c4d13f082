//! Declarative logger configuration

use super::{
    caller::CallerMode,
    error::{LoggerError, Result},
    level::Level,
    logger::{Logger, LoggerBuilder},
    timestamp::TimeFormat,
};
use crate::writers::{ConsoleWriter, IoWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output encoding of a configured logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// One JSON object per line
    #[default]
    Json,
    /// Human readable console lines
    Plain,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Json => "json",
            Encoding::Plain => "plain",
        })
    }
}

impl FromStr for Encoding {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "plain" => Ok(Encoding::Plain),
            other => Err(LoggerError::config(
                "encoding",
                format!("unknown encoding '{}', expected json or plain", other),
            )),
        }
    }
}

/// Logger settings, usually deserialized from a service's config file.
///
/// ```
/// use zlog::core::{Config, Encoding, Level};
///
/// let config = Config::from_json(r#"{"name":"api","level":"debug","caller":1}"#).unwrap();
/// assert_eq!(config.level, Level::Debug);
/// assert_eq!(config.encoding, Encoding::Json);
/// let logger = config.build().unwrap();
/// logger.debug().msg("configured");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name, recorded as the `logger` field
    pub name: Option<String>,
    pub level: Level,
    pub encoding: Encoding,
    /// `unix`, `unixms`, `unixwithms` or a strftime pattern; RFC 3339 with
    /// milliseconds when unset
    pub time_format: Option<String>,
    /// Timestamp field name, `time` when unset
    pub time_field: Option<String>,
    /// 0 disables caller fields, positive values record the short path and
    /// negative values the full path
    pub caller: i32,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(field) = &self.time_field {
            if field.trim().is_empty() {
                return Err(LoggerError::config("time_field", "must not be blank"));
            }
            if matches!(field.as_str(), "level" | "message" | "caller" | "goid" | "stack") {
                return Err(LoggerError::config(
                    "time_field",
                    format!("'{}' collides with a reserved field", field),
                ));
            }
        }
        if let Some(format) = &self.time_format {
            if format.trim().is_empty() {
                return Err(LoggerError::config("time_format", "must not be blank"));
            }
            if !self.time_format().is_valid() {
                return Err(LoggerError::config(
                    "time_format",
                    format!("invalid strftime pattern '{}'", format),
                ));
            }
        }
        Ok(())
    }

    pub fn time_format(&self) -> TimeFormat {
        match self.time_format.as_deref() {
            Some(format) => match format.parse() {
                Ok(format) => format,
                Err(never) => match never {},
            },
            None => TimeFormat::default(),
        }
    }

    /// Builder preloaded with these settings; the caller supplies the writer.
    pub fn builder(&self) -> Result<LoggerBuilder> {
        self.validate()?;

        let mut builder = Logger::builder()
            .level(self.level)
            .caller(CallerMode::from_depth(self.caller))
            .time_format(self.time_format());
        if let Some(field) = &self.time_field {
            builder = builder.time_field(field.as_str());
        }
        if let Some(name) = &self.name {
            builder = builder.name(name.as_str());
        }
        Ok(builder)
    }

    /// Logger writing to stderr in the configured encoding.
    pub fn build(&self) -> Result<Logger> {
        let builder = self.builder()?;
        Ok(match self.encoding {
            Encoding::Json => builder.writer(IoWriter::stderr()).build(),
            Encoding::Plain => {
                let mut console = ConsoleWriter::new();
                if let Some(field) = &self.time_field {
                    console = console.time_field(field.as_str());
                }
                builder.writer(console).build()
            }
        })
    }
}
