//! Encoders for the PostgreSQL `int2`, `int4` and `int8` types.
//!
//! Values that are not integers already go through [`Value::to_integer`]. The
//! range check against the target width happens in the probe phase, so an
//! out-of-range value fails before the caller allocates or writes anything.

use alloc::string::ToString;

use crate::encoding::byte_order::{write_i16, write_i32, write_i64};
use crate::errors::EncodeError;
use crate::protocol::{Encode, Intermediate, Probe};
use crate::value::Value;

/// Coerce `value` to an integer and narrow it to `T`.
fn narrow<T: TryFrom<i128>>(value: &Value) -> Result<T, EncodeError> {
    let wide = value.to_integer()?;
    T::try_from(wide).map_err(|_| EncodeError::RangeOverflow {
        value: wide.to_string(),
        width: core::mem::size_of::<T>(),
    })
}

macro_rules! integer_encoder {
    ($(#[$meta:meta])* $name:ident, $int:ty, $write:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl $name {
            /// Encoded width in bytes.
            pub const WIDTH: usize = core::mem::size_of::<$int>();

            fn prepare(value: &Value, intermediate: Intermediate) -> Result<$int, EncodeError> {
                match intermediate {
                    Intermediate::Integer(v) => {
                        <$int>::try_from(v).map_err(|_| EncodeError::RangeOverflow {
                            value: v.to_string(),
                            width: Self::WIDTH,
                        })
                    }
                    _ => narrow::<$int>(value),
                }
            }
        }

        impl Encode for $name {
            fn name(&self) -> &'static str {
                stringify!($name)
            }

            fn probe(&self, value: &Value) -> Result<Probe, EncodeError> {
                let v = narrow::<$int>(value)?;
                Ok(Probe::sized(Self::WIDTH, Intermediate::Integer(i64::from(v))))
            }

            fn write(
                &self,
                value: &Value,
                intermediate: Intermediate,
                out: &mut [u8],
            ) -> Result<usize, EncodeError> {
                let v = Self::prepare(value, intermediate)?;
                $write(v, out)
            }
        }
    };
}

integer_encoder!(
    /// Encoder for `int2` (`smallint`): signed 16-bit big-endian.
    Int2,
    i16,
    write_i16
);

integer_encoder!(
    /// Encoder for `int4` (`integer`): signed 32-bit big-endian.
    Int4,
    i32,
    write_i32
);

integer_encoder!(
    /// Encoder for `int8` (`bigint`): signed 64-bit big-endian.
    Int8,
    i64,
    write_i64
);
