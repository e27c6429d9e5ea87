//! Coercion contracts applied by the encoders.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};

use super::{Time, Value};
use crate::errors::EncodeError;

/// 2^127, the first `f64` above `i128::MAX`.
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Width reported when a value exceeds the host integer range itself.
const HOST_INTEGER_WIDTH: usize = core::mem::size_of::<i128>();

impl Value {
    /// Integer conversion used by the integer encoders.
    ///
    /// Reals are truncated toward zero and times yield their Unix seconds.
    /// Text and bytes are read like a leading decimal integer: surrounding
    /// whitespace, an optional sign, then digits with single `_` separators.
    /// Whatever follows the digits is ignored, and text without leading digits
    /// (the empty string included) reads as `0`, as does `Null`.
    ///
    /// # Errors
    ///
    /// * [`EncodeError::ConversionFailure`] if the value has no integer form.
    /// * [`EncodeError::RangeOverflow`] if it exceeds the host integer range.
    pub fn to_integer(&self) -> Result<i128, EncodeError> {
        match self {
            Value::Null => Ok(0),
            Value::Integer(v) => Ok(*v),
            Value::Real(v) => real_to_integer(*v),
            Value::Text(s) => parse_integer(s.as_bytes()),
            Value::Bytes(b) => parse_integer(b),
            Value::Time(t) => Ok(i128::from(t.unix_seconds())),
            Value::Object(object) => object
                .to_integer()
                .ok_or_else(|| conversion_failure("integer", self)),
            Value::Boolean(_) => Err(conversion_failure("integer", self)),
        }
    }

    /// Textual fallback used by the passthrough encoders.
    ///
    /// String-like values are borrowed as they are; every other value is
    /// rendered, which allocates.
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, [u8]> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_bytes()),
            Value::Bytes(b) => Cow::Borrowed(b),
            Value::Null => Cow::Borrowed(&[]),
            Value::Boolean(true) => Cow::Borrowed(b"true"),
            Value::Boolean(false) => Cow::Borrowed(b"false"),
            Value::Integer(v) => {
                let mut buffer = itoa::Buffer::new();
                Cow::Owned(buffer.format(*v).as_bytes().to_vec())
            }
            Value::Real(v) => {
                let mut buffer = ryu::Buffer::new();
                Cow::Owned(buffer.format(*v).as_bytes().to_vec())
            }
            Value::Time(t) => Cow::Owned(t.to_string().into_bytes()),
            Value::Object(object) => Cow::Owned(object.to_text()),
        }
    }

    /// Time conversion used by the timestamp encoder.
    ///
    /// Integers and reals are taken as seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// [`EncodeError::ConversionFailure`] if the value has no time form.
    pub fn to_time(&self) -> Result<Time, EncodeError> {
        let time = match self {
            Value::Time(t) => Some(*t),
            Value::Integer(v) => i64::try_from(*v).ok().and_then(|s| Time::from_unix(s, 0)),
            Value::Real(v) => Time::from_unix_f64(*v),
            Value::Object(object) => object.to_time(),
            _ => None,
        };
        time.ok_or_else(|| conversion_failure("time", self))
    }
}

fn conversion_failure(target: &'static str, value: &Value) -> EncodeError {
    EncodeError::ConversionFailure {
        target,
        found: value.type_name(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn real_to_integer(v: f64) -> Result<i128, EncodeError> {
    if !v.is_finite() {
        return Err(EncodeError::ConversionFailure {
            target: "integer",
            found: "non-finite real",
        });
    }
    if v < -I128_BOUND || v >= I128_BOUND {
        return Err(EncodeError::RangeOverflow {
            value: v.to_string(),
            width: HOST_INTEGER_WIDTH,
        });
    }
    // In range, so the cast only truncates the fraction.
    Ok(v as i128)
}

/// Read the leading decimal integer of `text`; no digits read as zero.
fn parse_integer(text: &[u8]) -> Result<i128, EncodeError> {
    let start = text
        .iter()
        .position(|&b| !is_space(b))
        .unwrap_or(text.len());
    let rest = &text[start..];
    let (negative, digits) = match rest.split_first() {
        Some((b'-', tail)) => (true, tail),
        Some((b'+', tail)) => (false, tail),
        _ => (false, rest),
    };

    let sign_len = rest.len() - digits.len();
    let mut value: i128 = 0;
    let mut after_digit = false;
    for (index, &byte) in digits.iter().enumerate() {
        match byte {
            b'0'..=b'9' => {
                let digit = i128::from(byte - b'0');
                let next = value.checked_mul(10).and_then(|v| {
                    if negative {
                        v.checked_sub(digit)
                    } else {
                        v.checked_add(digit)
                    }
                });
                let Some(next) = next else {
                    let read = &rest[..sign_len + index + 1];
                    return Err(EncodeError::RangeOverflow {
                        value: String::from_utf8_lossy(read).into_owned(),
                        width: HOST_INTEGER_WIDTH,
                    });
                };
                value = next;
                after_digit = true;
            }
            b'_' if after_digit => after_digit = false,
            _ => break,
        }
    }
    Ok(value)
}

/// Whitespace skipped before a number: space, `\t`, `\n`, `\v`, `\f` and `\r`.
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t'..=b'\r')
}
