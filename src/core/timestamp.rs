//! Timestamp formatting utilities
//!
//! Renders timestamps straight into a record buffer, either as a quoted
//! string or, for the Unix variants, as a bare JSON number.

use super::text::append_fmt;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Offset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use zlog::core::TimeFormat;
/// use chrono::{TimeZone, Utc};
///
/// let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// let mut buf = Vec::new();
/// TimeFormat::Rfc3339Millis.append(&mut buf, &t);
/// assert_eq!(buf, b"\"2025-01-08T10:30:45Z\"");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    /// RFC 3339 with up to millisecond precision: `2025-01-08T10:30:45.12Z`
    ///
    /// Trailing zeros of the fraction are dropped, and the dot too when the
    /// fraction is zero. UTC prints as `Z`, other zones as `+hh:mm`.
    #[default]
    Rfc3339Millis,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix seconds with a three digit millisecond fraction: `1736332245.123`
    UnixWithMillis,

    /// Custom strftime format, rendered as a string
    ///
    /// A pattern chrono cannot render falls back to [`TimeFormat::Rfc3339Millis`].
    Custom(String),
}

impl TimeFormat {
    /// Append the timestamp, quoted when the format is textual.
    pub fn append<Tz>(&self, buf: &mut Vec<u8>, t: &DateTime<Tz>)
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimeFormat::Rfc3339Millis => {
                buf.push(b'"');
                append_rfc3339_millis(buf, t);
                buf.push(b'"');
            }
            TimeFormat::Unix => {
                let _ = write!(buf, "{}", t.timestamp());
            }
            TimeFormat::UnixMillis => {
                let _ = write!(buf, "{}", t.timestamp_millis());
            }
            TimeFormat::UnixWithMillis => {
                let _ = write!(
                    buf,
                    "{}.{:03}",
                    t.timestamp(),
                    t.timestamp_subsec_millis().min(999)
                );
            }
            TimeFormat::Custom(format_str) => {
                buf.push(b'"');
                let start = buf.len();
                if append_fmt(buf, format_args!("{}", t.format(format_str))).is_err() {
                    buf.truncate(start);
                    append_rfc3339_millis(buf, t);
                }
                buf.push(b'"');
            }
        }
    }

    /// False for a custom pattern with specifiers chrono does not know.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            TimeFormat::Custom(pattern) => {
                !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
            }
            _ => true,
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimeFormat::Unix | TimeFormat::UnixMillis | TimeFormat::UnixWithMillis
        )
    }
}

impl FromStr for TimeFormat {
    type Err = std::convert::Infallible;

    /// `unix`, `unixms` and `unixwithms` select the numeric formats, an empty
    /// string the default, anything else is taken as a strftime pattern.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => TimeFormat::Rfc3339Millis,
            "unix" => TimeFormat::Unix,
            "unixms" => TimeFormat::UnixMillis,
            "unixwithms" => TimeFormat::UnixWithMillis,
            other => TimeFormat::Custom(other.to_string()),
        })
    }
}

fn append_rfc3339_millis<Tz>(buf: &mut Vec<u8>, t: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let _ = write!(buf, "{}", t.format("%Y-%m-%dT%H:%M:%S"));

    let millis = t.timestamp_subsec_millis().min(999);
    if millis != 0 {
        let digits = [
            b'0' + (millis / 100) as u8,
            b'0' + (millis / 10 % 10) as u8,
            b'0' + (millis % 10) as u8,
        ];
        let len = digits.iter().rposition(|&c| c != b'0').map_or(0, |p| p + 1);
        buf.push(b'.');
        buf.extend_from_slice(&digits[..len]);
    }

    if t.offset().fix().local_minus_utc() == 0 {
        buf.push(b'Z');
    } else {
        let _ = write!(buf, "{}", t.format("%:z"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.120456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(120456)
    }

    fn render<Tz>(format: &TimeFormat, t: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut buf = Vec::new();
        format.append(&mut buf, t);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_rfc3339_millis_trims_zeros() {
        let result = render(&TimeFormat::Rfc3339Millis, &fixed_datetime());
        assert_eq!(result, "\"2025-01-08T10:30:45.12Z\"");
    }

    #[test]
    fn test_rfc3339_millis_whole_second() {
        let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
        assert_eq!(
            render(&TimeFormat::Rfc3339Millis, &t),
            "\"2025-01-08T10:30:45Z\""
        );
    }

    #[test]
    fn test_rfc3339_millis_with_offset() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let t = tz.with_ymd_and_hms(2025, 1, 8, 18, 30, 45).unwrap();
        assert_eq!(
            render(&TimeFormat::Rfc3339Millis, &t),
            "\"2025-01-08T18:30:45+08:00\""
        );
    }

    #[test]
    fn test_unix_formats() {
        let t = fixed_datetime();
        assert_eq!(render(&TimeFormat::Unix, &t), "1736332245");
        assert_eq!(render(&TimeFormat::UnixMillis, &t), "1736332245120");
        assert_eq!(render(&TimeFormat::UnixWithMillis, &t), "1736332245.120");
    }

    #[test]
    fn test_custom_format() {
        let format = TimeFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(render(&format, &fixed_datetime()), "\"2025/01/08 10:30\"");
    }

    #[test]
    fn test_invalid_custom_pattern_falls_back() {
        let format = TimeFormat::Custom("%Q".to_string());
        assert!(!format.is_valid());
        assert_eq!(
            render(&format, &fixed_datetime()),
            "\"2025-01-08T10:30:45.12Z\""
        );
        assert!(TimeFormat::Custom("%Y-%m-%d".to_string()).is_valid());
        assert!(TimeFormat::Unix.is_valid());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("unixms".parse::<TimeFormat>().unwrap(), TimeFormat::UnixMillis);
        assert_eq!("".parse::<TimeFormat>().unwrap(), TimeFormat::Rfc3339Millis);
        assert_eq!(
            "%H:%M".parse::<TimeFormat>().unwrap(),
            TimeFormat::Custom("%H:%M".to_string())
        );
    }

    #[test]
    fn test_is_numeric() {
        assert!(!TimeFormat::Rfc3339Millis.is_numeric());
        assert!(TimeFormat::Unix.is_numeric());
        assert!(TimeFormat::UnixWithMillis.is_numeric());
        assert!(!TimeFormat::Custom("%Y".to_string()).is_numeric());
    }
}
