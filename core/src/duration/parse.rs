//! duration/parse.rs
//! Parses `<number>[.<fraction>][unit]` components, summed.
//!
//! Grammar notes:
//! - Units: ns, us, µs, μs, ms, s, m, h. A component with no unit is seconds.
//! - The literal `"0"` is zero.
//! - Overflow is checked before every multiply, never after.
//! - Once a fraction overflows, its remaining digits are consumed and ignored;
//!   the fraction keeps the value it had before the overflowing digit.

use crate::constants::units;
use crate::duration::types::DurationError;

/// Parse a duration string into signed nanoseconds.
pub fn parse_duration(s: &str) -> Result<i64, DurationError> {
    if s.is_empty() {
        return Err(DurationError::Empty);
    }
    if s == "0" {
        return Ok(0);
    }

    let invalid = || DurationError::Invalid { input: s.to_string() };
    let overflow = || DurationError::Overflow { input: s.to_string() };

    let mut rest = s.as_bytes();
    let mut total: i64 = 0;

    while !rest.is_empty() {
        let c = rest[0];
        if !(c == b'.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        // Integer part.
        let before = rest.len();
        let (whole, after) = leading_int(rest).ok_or_else(overflow)?;
        rest = after;
        let had_int = before != rest.len();

        // Fraction part.
        let mut frac: i64 = 0;
        let mut scale: f64 = 1.0;
        let mut had_frac = false;
        if rest.first() == Some(&b'.') {
            rest = &rest[1..];
            let before = rest.len();
            let (f, sc, after) = leading_fraction(rest);
            frac = f;
            scale = sc;
            rest = after;
            had_frac = before != rest.len();
        }
        if !had_int && !had_frac {
            return Err(invalid());
        }

        // Unit: everything up to the next digit or '.'.
        let end = rest
            .iter()
            .position(|&c| c == b'.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit_bytes, after) = rest.split_at(end);
        rest = after;

        let unit = if unit_bytes.is_empty() {
            units::SECOND
        } else {
            unit_value(unit_bytes).ok_or_else(|| DurationError::UnknownUnit {
                unit: String::from_utf8_lossy(unit_bytes).into_owned(),
                input: s.to_string(),
            })?
        };

        if whole > i64::MAX / unit {
            return Err(overflow());
        }
        let mut v = whole * unit;
        if frac > 0 {
            let part = (frac as f64 * (unit as f64 / scale)) as i64;
            v = v.checked_add(part).ok_or_else(overflow)?;
        }

        total = total.checked_add(v).ok_or_else(overflow)?;
    }

    Ok(total)
}

fn unit_value(unit: &[u8]) -> Option<i64> {
    match unit {
        b"ns" => Some(units::NANOSECOND),
        b"us" => Some(units::MICROSECOND),
        // U+00B5 micro sign, U+03BC greek small mu
        [0xC2, 0xB5, b's'] | [0xCE, 0xBC, b's'] => Some(units::MICROSECOND),
        b"ms" => Some(units::MILLISECOND),
        b"s" => Some(units::SECOND),
        b"m" => Some(units::MINUTE),
        b"h" => Some(units::HOUR),
        _ => None,
    }
}

/// Consume leading decimal digits. `None` on i64 overflow.
fn leading_int(s: &[u8]) -> Option<(i64, &[u8])> {
    let mut x: i64 = 0;
    let mut i = 0;
    while i < s.len() && s[i].is_ascii_digit() {
        if x > i64::MAX / 10 {
            return None;
        }
        x = (x * 10).checked_add(i64::from(s[i] - b'0'))?;
        i += 1;
    }
    Some((x, &s[i..]))
}

/// Consume leading fractional digits, returning the digits as an integer and
/// the power of ten they are scaled by.
fn leading_fraction(s: &[u8]) -> (i64, f64, &[u8]) {
    let mut x: i64 = 0;
    let mut scale: f64 = 1.0;
    let mut overflowed = false;
    let mut i = 0;
    while i < s.len() && s[i].is_ascii_digit() {
        let digit = i64::from(s[i] - b'0');
        i += 1;
        if overflowed {
            continue;
        }
        if x > i64::MAX / 10 {
            overflowed = true;
            continue;
        }
        match (x * 10).checked_add(digit) {
            Some(y) => {
                x = y;
                scale *= 10.0;
            }
            None => overflowed = true,
        }
    }
    (x, scale, &s[i..])
}
