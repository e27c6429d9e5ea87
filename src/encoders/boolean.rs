//! Encoder for the PostgreSQL `boolean` type.

use crate::errors::EncodeError;
use crate::protocol::{Encode, Intermediate, Probe};
use crate::value::Value;

/// Encoder for `boolean`: one byte, `0x01` for true and `0x00` for false.
///
/// Only [`Value::Boolean`] is accepted; no other value is coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Boolean;

impl Boolean {
    fn byte(value: &Value) -> Result<u8, EncodeError> {
        match value {
            Value::Boolean(b) => Ok(u8::from(*b)),
            other => Err(EncodeError::TypeMismatch {
                encoder: "Boolean",
                expected: "boolean",
                found: other.type_name(),
            }),
        }
    }
}

impl Encode for Boolean {
    fn name(&self) -> &'static str {
        "Boolean"
    }

    fn probe(&self, value: &Value) -> Result<Probe, EncodeError> {
        Self::byte(value)?;
        Ok(Probe::sized(1, Intermediate::Empty))
    }

    fn write(
        &self,
        value: &Value,
        _intermediate: Intermediate,
        out: &mut [u8],
    ) -> Result<usize, EncodeError> {
        let byte = Self::byte(value)?;
        let slot = out.first_mut().ok_or(EncodeError::BufferTooSmall {
            needed: 1,
            available: 0,
        })?;
        *slot = byte;
        Ok(1)
    }
}
