//! Host values accepted by the encoders.
//!
//! [`Value`] stands in for the dynamically typed values of the application
//! layer. Encoders never inspect a value beyond the coercion contracts defined
//! here:
//!
//! - the integer conversion used by the `Int2`/`Int4`/`Int8` encoders
//!   ([`Value::to_integer`]);
//! - the textual fallback used by the passthrough encoders
//!   ([`Value::to_text`]);
//! - the time conversion used by the `Timestamp` encoder ([`Value::to_time`]).
//!
//! Application types that are not covered by the built-in variants plug in
//! through [`HostObject`].

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

mod coerce;
mod display;
mod time;

pub use time::{LocalZone, Time};

/// Capabilities of an application object that is not one of the built-in value kinds.
///
/// Only [`HostObject::to_text`] is mandatory, mirroring the fact that any host
/// object can be rendered as a string while integer and time conversions are
/// optional.
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Short name of the object's type, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Textual representation of the object, as raw bytes.
    fn to_text(&self) -> Vec<u8>;

    /// Integer conversion, if the object supports one.
    fn to_integer(&self) -> Option<i128> {
        None
    }

    /// Time conversion, if the object supports one.
    fn to_time(&self) -> Option<Time> {
        None
    }
}

/// A value to be encoded.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Boolean(bool),
    /// Integer of arbitrary host precision.
    Integer(i128),
    /// IEEE 754 floating point.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw binary data.
    Bytes(Vec<u8>),
    /// A point in time.
    Time(Time),
    /// Application object coerced through [`HostObject`].
    Object(Arc<dyn HostObject>),
}

impl Value {
    /// Short name of the value's type, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Time(_) => "time",
            Value::Object(object) => object.type_name(),
        }
    }

    /// Wrap an application object.
    #[must_use]
    pub fn object<T: HostObject + 'static>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Returns the raw bytes of string-like values, `None` for everything else.
    #[must_use]
    pub fn as_raw_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Text(s) => Some(s.as_bytes()),
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Check if the value is Null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

macro_rules! from_integer {
    ($($int:ty),+) => {
        $(
            impl From<$int> for Value {
                fn from(v: $int) -> Self {
                    Value::Integer(i128::from(v))
                }
            }
        )+
    };
}

from_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Time> for Value {
    fn from(v: Time) -> Self {
        Value::Time(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

// ============================================================================
// Arbitrary implementations for testing
// ============================================================================

#[cfg(feature = "testing")]
mod arbitrary_impl {
    use super::{Time, Value};
    use crate::testing::TextObject;
    use alloc::vec::Vec;
    use arbitrary::{Arbitrary, Unstructured};

    impl<'a> Arbitrary<'a> for Time {
        fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
            let secs: i64 = u.arbitrary()?;
            let nanos: u32 = u.int_in_range(0..=999_999_999)?;
            let time = Time::from_unix(secs, nanos).ok_or(arbitrary::Error::IncorrectFormat)?;
            if u.arbitrary()? {
                let offset: i32 = u.int_in_range(-86_399..=86_399)?;
                time.with_utc_offset(offset)
                    .ok_or(arbitrary::Error::IncorrectFormat)
            } else {
                Ok(time)
            }
        }
    }

    impl<'a> Arbitrary<'a> for Value {
        fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
            Ok(match u.int_in_range(0..=7u8)? {
                0 => Value::Null,
                1 => Value::Boolean(u.arbitrary()?),
                2 => Value::Integer(u.arbitrary()?),
                3 => Value::Real(u.arbitrary()?),
                4 => Value::Text(u.arbitrary()?),
                5 => Value::Bytes(u.arbitrary()?),
                6 => Value::Time(u.arbitrary()?),
                _ => {
                    let text: Vec<u8> = u.arbitrary()?;
                    let object = TextObject::new(text);
                    Value::object(match u.arbitrary::<Option<i128>>()? {
                        Some(integer) => object.with_integer(integer),
                        None => object,
                    })
                }
            })
        }
    }
}
