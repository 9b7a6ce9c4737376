//! Number helpers

use super::{Array, Value, ValueKind, check_length};
use crate::diagnostics::Result;

/// Longest decimal prefix of `text`, after leading whitespace.
///
/// Accepts an optional sign, digits with an optional fraction, an optional exponent and
/// the word `Infinity`. Returns `None` when no digits lead the text.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        let sign = if text.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - digits_start;
    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut cursor = fraction_start;
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
        digits += cursor - fraction_start;
        if digits > 0 {
            end = cursor;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exponent_start = cursor;
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
        if cursor > exponent_start {
            end = cursor;
        }
    }

    text[..end].parse().ok()
}

/// `0, 1, .. n-1` for a non-negative whole `n`
pub fn counting(n: f64) -> Result<Option<Value>> {
    if !(n >= 0.0 && n.fract() == 0.0 && n.is_finite()) {
        return Ok(None);
    }
    let len = n as u64;
    check_length(len, "Counting array")?;
    let items = (0..len).map(|i| Value::Number(i as f64)).collect();
    Ok(Some(Value::Array(Array::of(ValueKind::Number, items))))
}
