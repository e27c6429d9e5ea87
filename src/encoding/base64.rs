//! Forward, in-place base64 decoding.
//!
//! The `FromBase64` encoder lets its child write base64 text straight into the
//! output buffer and then decodes that text where it lies. Decoding runs left
//! to right, one quantum of up to four symbols at a time:
//!
//! ```text
//! read  ──►  a G V s  b G 8 =
//! write ──►  h e l    l o
//! ```
//!
//! A quantum is staged on the stack before its (at most three) bytes are
//! stored, and every quantum consumes at least one more input byte than it
//! produces. The write cursor therefore never passes the read cursor, and no
//! unread symbol is ever overwritten.
//!
//! ASCII whitespace between symbols is skipped so that line-wrapped base64 is
//! accepted. Padding is optional, but once a padded quantum has been seen no
//! further symbols may follow.

use alloc::vec::Vec;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, DecodeSliceError, Engine as _, alphabet};

use crate::errors::EncodeError;

/// Standard alphabet, padding optional, canonical trailing bits required.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Symbols per base64 quantum.
const QUANTUM: usize = 4;

/// Decode the base64 text held in `buf` into the start of `buf`.
///
/// Returns the decoded length, which never exceeds the text length. On error
/// the buffer content is unspecified.
pub(crate) fn decode_in_place(buf: &mut [u8]) -> Result<usize, EncodeError> {
    let mut quad = [0u8; QUANTUM];
    let mut positions = [0usize; QUANTUM];
    let mut filled = 0;
    let mut written = 0;
    let mut padded = false;

    for read in 0..buf.len() {
        let byte = buf[read];
        if byte.is_ascii_whitespace() {
            continue;
        }
        if padded {
            return Err(EncodeError::MalformedInput {
                position: read,
                reason: "data after padding",
            });
        }
        quad[filled] = byte;
        positions[filled] = read;
        filled += 1;
        if filled == QUANTUM {
            written += store_quantum(&quad, &positions, buf, written, read + 1)?;
            padded = byte == b'=';
            filled = 0;
        }
    }
    if filled > 0 {
        let end = buf.len();
        written += store_quantum(&quad[..filled], &positions, buf, written, end)?;
    }
    Ok(written)
}

/// Decode base64 text held in an owned buffer, reusing its allocation.
pub(crate) fn decode_owned(mut text: Vec<u8>) -> Result<Vec<u8>, EncodeError> {
    let len = decode_in_place(&mut text)?;
    text.truncate(len);
    Ok(text)
}

/// Decode one staged quantum and store its bytes at `write`.
///
/// `read` is the index just past the last input byte consumed so far.
fn store_quantum(
    quad: &[u8],
    positions: &[usize; QUANTUM],
    buf: &mut [u8],
    write: usize,
    read: usize,
) -> Result<usize, EncodeError> {
    let mut decoded = [0u8; 3];
    let len = ENGINE.decode_slice(quad, &mut decoded).map_err(|error| {
        let (offset, reason) = match error {
            DecodeSliceError::DecodeError(DecodeError::InvalidByte(offset, _)) => {
                (offset, "invalid symbol")
            }
            DecodeSliceError::DecodeError(DecodeError::InvalidLastSymbol(offset, _)) => {
                (offset, "invalid trailing bits")
            }
            DecodeSliceError::DecodeError(DecodeError::InvalidPadding) => (0, "invalid padding"),
            _ => (0, "truncated input"),
        };
        EncodeError::MalformedInput {
            position: positions.get(offset).copied().unwrap_or(positions[0]),
            reason,
        }
    })?;
    assert!(
        write + len <= read,
        "base64 write cursor {write}+{len} overtook read cursor {read}"
    );
    buf[write..write + len].copy_from_slice(&decoded[..len]);
    Ok(len)
}
