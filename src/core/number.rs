//! Text encoding for numbers and durations
//!
//! All helpers append directly to the record buffer. Writing through
//! `io::Write` on a `Vec<u8>` cannot fail, so the results are discarded.

use chrono::TimeDelta;
use std::fmt;
use std::io::Write;

/// Append an integer of any width in decimal.
#[inline]
pub fn append_int<I: fmt::Display>(buf: &mut Vec<u8>, i: I) {
    let _ = write!(buf, "{}", i);
}

/// Append a 64-bit float.
///
/// NaN and infinities become the quoted sentinels `"NaN"`, `"+Inf"` and
/// `"-Inf"`. Magnitudes below 1e-6 or at least 1e21 use exponent form.
pub fn append_f64(buf: &mut Vec<u8>, f: f64) {
    if let Some(sentinel) = non_finite(f.is_nan(), f.is_infinite(), f.is_sign_positive()) {
        buf.extend_from_slice(sentinel);
        return;
    }
    let abs = f.abs();
    if abs != 0.0 && (abs < 1e-6 || abs >= 1e21) {
        let _ = write!(buf, "{:e}", f);
        fix_exponent(buf);
    } else {
        let _ = write!(buf, "{}", f);
    }
}

/// Append a 32-bit float. Thresholds are compared in single precision so
/// the cutoffs match the value as stored.
pub fn append_f32(buf: &mut Vec<u8>, f: f32) {
    if let Some(sentinel) = non_finite(f.is_nan(), f.is_infinite(), f.is_sign_positive()) {
        buf.extend_from_slice(sentinel);
        return;
    }
    let abs = f.abs();
    if abs != 0.0 && (abs < 1e-6 || abs >= 1e21) {
        let _ = write!(buf, "{:e}", f);
        fix_exponent(buf);
    } else {
        let _ = write!(buf, "{}", f);
    }
}

fn non_finite(nan: bool, inf: bool, positive: bool) -> Option<&'static [u8]> {
    if nan {
        Some(b"\"NaN\"")
    } else if inf && positive {
        Some(b"\"+Inf\"")
    } else if inf {
        Some(b"\"-Inf\"")
    } else {
        None
    }
}

// `{:e}` renders `1e21` and `2e-10`; positive exponents get an explicit sign.
fn fix_exponent(buf: &mut Vec<u8>) {
    if let Some(pos) = buf.iter().rposition(|&c| c == b'e') {
        if buf.get(pos + 1) != Some(&b'-') {
            buf.insert(pos + 1, b'+');
        }
    }
}

/// Append a duration as milliseconds.
///
/// Whole milliseconds print as an integer. Any sub-millisecond remainder
/// adds up to three fractional digits (microsecond resolution) with
/// trailing zeros dropped. Negative durations print the magnitude with a
/// leading `-`.
pub fn append_duration(buf: &mut Vec<u8>, d: TimeDelta) {
    let d = if d < TimeDelta::zero() {
        buf.push(b'-');
        d.abs()
    } else {
        d
    };
    let millis = d.num_milliseconds();
    append_int(buf, millis);

    let rest = d - TimeDelta::milliseconds(millis);
    let micros = rest.num_microseconds().unwrap_or(0);
    if micros == 0 {
        return;
    }
    let digits = [
        b'0' + (micros / 100) as u8,
        b'0' + (micros / 10 % 10) as u8,
        b'0' + (micros % 10) as u8,
    ];
    let len = digits.iter().rposition(|&c| c != b'0').map_or(0, |p| p + 1);
    buf.push(b'.');
    buf.extend_from_slice(&digits[..len]);
}

/// Convert a std duration, saturating at the largest representable delta.
pub fn from_std(d: std::time::Duration) -> TimeDelta {
    TimeDelta::from_std(d).unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_text(f: f64) -> String {
        let mut buf = Vec::new();
        append_f64(&mut buf, f);
        String::from_utf8(buf).unwrap()
    }

    fn f32_text(f: f32) -> String {
        let mut buf = Vec::new();
        append_f32(&mut buf, f);
        String::from_utf8(buf).unwrap()
    }

    fn dur_text(d: TimeDelta) -> String {
        let mut buf = Vec::new();
        append_duration(&mut buf, d);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_float_fixed_notation() {
        assert_eq!(f64_text(0.0), "0");
        assert_eq!(f64_text(1.0), "1");
        assert_eq!(f64_text(-3.25), "-3.25");
        assert_eq!(f64_text(0.000001), "0.000001");
        assert_eq!(f64_text(123456789.5), "123456789.5");
    }

    #[test]
    fn test_float_exponent_notation() {
        assert_eq!(f64_text(2e-10), "2e-10");
        assert_eq!(f64_text(5e-9), "5e-9");
        assert_eq!(f64_text(1e21), "1e+21");
        assert_eq!(f64_text(-1.5e22), "-1.5e+22");
    }

    #[test]
    fn test_float_sentinels() {
        assert_eq!(f64_text(f64::NAN), "\"NaN\"");
        assert_eq!(f64_text(f64::INFINITY), "\"+Inf\"");
        assert_eq!(f64_text(f64::NEG_INFINITY), "\"-Inf\"");
        assert_eq!(f32_text(f32::NAN), "\"NaN\"");
    }

    #[test]
    fn test_float32_shortest() {
        assert_eq!(f32_text(0.1), "0.1");
        assert_eq!(f32_text(1e-7), "1e-7");
    }

    #[test]
    fn test_duration_whole_millis() {
        assert_eq!(dur_text(TimeDelta::seconds(2)), "2000");
        assert_eq!(dur_text(TimeDelta::zero()), "0");
    }

    #[test]
    fn test_duration_fraction() {
        assert_eq!(dur_text(TimeDelta::microseconds(1_500_100)), "1500.1");
        assert_eq!(dur_text(TimeDelta::microseconds(1_500_123)), "1500.123");
        assert_eq!(dur_text(TimeDelta::microseconds(7)), "0.007");
        assert_eq!(dur_text(TimeDelta::nanoseconds(250_000)), "0.25");
    }

    #[test]
    fn test_duration_negative() {
        assert_eq!(dur_text(TimeDelta::microseconds(-1_500_100)), "-1500.1");
        assert_eq!(dur_text(TimeDelta::milliseconds(-3)), "-3");
    }

    #[test]
    fn test_integers() {
        let mut buf = Vec::new();
        append_int(&mut buf, i64::MIN);
        buf.push(b' ');
        append_int(&mut buf, u64::MAX);
        assert_eq!(buf, b"-9223372036854775808 18446744073709551615");
    }
}
