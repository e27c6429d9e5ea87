//! Composite encoder turning base64 text into its binary form.

use crate::encoder::Encoder;
use crate::encoding::base64::{decode_in_place, decode_owned};
use crate::errors::EncodeError;
use crate::protocol::{Encode, Intermediate, Probe};
use crate::value::Value;
use alloc::boxed::Box;

/// Composite encoder that base64-decodes the output of its element encoder.
///
/// The element encoder renders the value as base64 text; this encoder sends
/// the decoded bytes, typically for a `bytea` parameter.
///
/// - If the element reports a size, that size is passed on unchanged: the
///   element writes its text into the caller's buffer, which is then decoded
///   in place. Decoding shrinks the data, so the final length returned by
///   [`Encode::write`] is at most the reported size.
/// - If the element materializes its text, the text is decoded right away and
///   the decoded bytes are returned materialized as well.
///
/// Both paths produce the same bytes for the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FromBase64<E = Encoder> {
    elements: Box<E>,
}

impl<E: Encode> FromBase64<E> {
    /// Wrap an element encoder.
    #[must_use]
    pub fn new(elements: E) -> Self {
        Self {
            elements: Box::new(elements),
        }
    }

    /// The wrapped element encoder.
    #[must_use]
    pub fn elements(&self) -> &E {
        &self.elements
    }
}

impl<E: Encode> Encode for FromBase64<E> {
    fn name(&self) -> &'static str {
        "FromBase64"
    }

    fn probe(&self, value: &Value) -> Result<Probe, EncodeError> {
        match self.elements.probe(value)? {
            sized @ Probe::Sized { .. } => Ok(sized),
            Probe::Materialized(text) => Ok(Probe::Materialized(decode_owned(text)?)),
        }
    }

    fn write(
        &self,
        value: &Value,
        intermediate: Intermediate,
        out: &mut [u8],
    ) -> Result<usize, EncodeError> {
        let text_len = self.elements.write(value, intermediate, out)?;
        let available = out.len();
        let text = out.get_mut(..text_len).ok_or(EncodeError::BufferTooSmall {
            needed: text_len,
            available,
        })?;
        decode_in_place(text)
    }
}
