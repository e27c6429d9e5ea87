//! The two-phase encode protocol shared by every encoder.
//!
//! Encoding a value takes two steps:
//!
//! 1. [`Encode::probe`] inspects the value and reports how many bytes the
//!    encoded form needs. It does the expensive preparation (coercing to an
//!    integer, converting a time to its zone, ...) once and hands the result
//!    back as an [`Intermediate`].
//! 2. The caller allocates exactly that many bytes and passes the buffer,
//!    together with the intermediate, to [`Encode::write`].
//!
//! Some encoders can only learn their length by producing the final bytes.
//! Those return [`Probe::Materialized`] and no write phase follows.
//!
//! The intermediate is an ordinary value owned by the caller, so encoders stay
//! free of per-call state and can be shared between threads.
//!
//! ```
//! use pg_binary_encoder::{Encode, Encoder, Probe, Value};
//!
//! let encoder = Encoder::int4();
//! let value = Value::from("1000");
//!
//! let Probe::Sized { len, intermediate } = encoder.probe(&value)? else {
//!     unreachable!("Int4 has a fixed width");
//! };
//! let mut buf = vec![0u8; len];
//! let written = encoder.write(&value, intermediate, &mut buf)?;
//! assert_eq!(&buf[..written], &[0x00, 0x00, 0x03, 0xe8]);
//! # Ok::<(), pg_binary_encoder::EncodeError>(())
//! ```

use alloc::vec::Vec;

use crate::errors::EncodeError;
use crate::value::{Time, Value};

/// Prepared form of a value, produced by [`Encode::probe`] and consumed by
/// [`Encode::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Intermediate {
    /// Nothing was prepared; the write phase works from the value itself.
    #[default]
    Empty,
    /// An integer already checked against the encoder's width.
    Integer(i64),
    /// A time already converted to the zone it is sent in.
    Time(Time),
}

/// Outcome of the probe phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The encoded form needs exactly `len` bytes of buffer.
    Sized {
        /// Buffer size the write phase requires.
        len: usize,
        /// Prepared form of the value to hand to the write phase.
        intermediate: Intermediate,
    },
    /// The final encoded bytes; the length was only known once they existed.
    Materialized(Vec<u8>),
}

impl Probe {
    /// A sized probe result.
    #[must_use]
    pub fn sized(len: usize, intermediate: Intermediate) -> Self {
        Probe::Sized { len, intermediate }
    }

    /// The number of bytes the caller has to provide, or holds, respectively.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Probe::Sized { len, .. } => *len,
            Probe::Materialized(bytes) => bytes.len(),
        }
    }

    /// Whether the encoded form is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An encoder following the two-phase protocol.
///
/// Implementations must not keep state between the two calls: anything the
/// write phase needs travels through the [`Intermediate`].
pub trait Encode {
    /// Name of the encoder, used in error messages.
    fn name(&self) -> &'static str;

    /// First phase: report the encoded size without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the value cannot be encoded.
    fn probe(&self, value: &Value) -> Result<Probe, EncodeError>;

    /// Second phase: write the encoded form of `value` into `out`.
    ///
    /// `out` is as long as the length reported by [`Encode::probe`] and
    /// `intermediate` is what the probe returned. Returns the number of bytes
    /// written, which is at most `out.len()`.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the value cannot be encoded or `out` is
    /// shorter than required.
    fn write(
        &self,
        value: &Value,
        intermediate: Intermediate,
        out: &mut [u8],
    ) -> Result<usize, EncodeError>;

    /// Run both phases and append the encoded form to `out`.
    ///
    /// Returns the number of bytes appended. On error `out` is left as it was.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the value cannot be encoded, and
    /// [`EncodeError::LengthMismatch`] if `write` claims more bytes than it was
    /// given.
    fn encode_into(&self, value: &Value, out: &mut Vec<u8>) -> Result<usize, EncodeError> {
        match self.probe(value)? {
            Probe::Materialized(bytes) => {
                out.extend_from_slice(&bytes);
                Ok(bytes.len())
            }
            Probe::Sized { len, intermediate } => {
                let start = out.len();
                out.resize(start + len, 0);
                let result = match self.write(value, intermediate, &mut out[start..]) {
                    Ok(written) if written > len => Err(EncodeError::LengthMismatch {
                        encoder: self.name(),
                        reserved: len,
                        written,
                    }),
                    other => other,
                };
                match result {
                    Ok(written) => out.truncate(start + written),
                    Err(_) => out.truncate(start),
                }
                result
            }
        }
    }

    /// Run both phases and return the encoded form.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the value cannot be encoded.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.encode_into(value, &mut out)?;
        Ok(out)
    }
}

impl<E: Encode + ?Sized> Encode for &E {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn probe(&self, value: &Value) -> Result<Probe, EncodeError> {
        (**self).probe(value)
    }

    fn write(
        &self,
        value: &Value,
        intermediate: Intermediate,
        out: &mut [u8],
    ) -> Result<usize, EncodeError> {
        (**self).write(value, intermediate, out)
    }
}

impl<E: Encode + ?Sized> Encode for alloc::boxed::Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn probe(&self, value: &Value) -> Result<Probe, EncodeError> {
        (**self).probe(value)
    }

    fn write(
        &self,
        value: &Value,
        intermediate: Intermediate,
        out: &mut [u8],
    ) -> Result<usize, EncodeError> {
        (**self).write(value, intermediate, out)
    }
}
