//! Encoder for `text`-like and `bytea` parameters sent as raw bytes.

use crate::encoding::byte_order::copy_prefix;
use crate::errors::EncodeError;
use crate::protocol::{Encode, Intermediate, Probe};
use crate::value::Value;

/// Passthrough encoder backing both the `String` and the `Bytea` encoders.
///
/// String-like values are copied verbatim. Any other value is rendered through
/// [`Value::to_text`]; as its length is only known after rendering, the probe
/// returns the rendered bytes as [`Probe::Materialized`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Passthrough;

impl Encode for Passthrough {
    fn name(&self) -> &'static str {
        "String"
    }

    fn probe(&self, value: &Value) -> Result<Probe, EncodeError> {
        Ok(match value.as_raw_bytes() {
            Some(bytes) => Probe::sized(bytes.len(), Intermediate::Empty),
            None => Probe::Materialized(value.to_text().into_owned()),
        })
    }

    fn write(
        &self,
        value: &Value,
        _intermediate: Intermediate,
        out: &mut [u8],
    ) -> Result<usize, EncodeError> {
        copy_prefix(&value.to_text(), out)
    }
}
