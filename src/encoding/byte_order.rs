//! Big-endian ("network byte order") integer writers.
//!
//! Each writer fills the start of `out` and returns the number of bytes
//! written. A buffer shorter than the integer is reported instead of panicking.

use crate::errors::EncodeError;

/// Write a signed 16-bit integer big-endian.
pub(crate) fn write_i16(value: i16, out: &mut [u8]) -> Result<usize, EncodeError> {
    put(value.to_be_bytes(), out)
}

/// Write a signed 32-bit integer big-endian.
pub(crate) fn write_i32(value: i32, out: &mut [u8]) -> Result<usize, EncodeError> {
    put(value.to_be_bytes(), out)
}

/// Write a signed 64-bit integer big-endian.
pub(crate) fn write_i64(value: i64, out: &mut [u8]) -> Result<usize, EncodeError> {
    put(value.to_be_bytes(), out)
}

/// Copy `bytes` to the start of `out`.
pub(crate) fn put<const N: usize>(bytes: [u8; N], out: &mut [u8]) -> Result<usize, EncodeError> {
    copy_prefix(&bytes, out)
}

/// Copy a byte slice to the start of `out`.
pub(crate) fn copy_prefix(bytes: &[u8], out: &mut [u8]) -> Result<usize, EncodeError> {
    let available = out.len();
    let dst = out
        .get_mut(..bytes.len())
        .ok_or(EncodeError::BufferTooSmall {
            needed: bytes.len(),
            available,
        })?;
    dst.copy_from_slice(bytes);
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_i16() {
        let mut buf = [0u8; 2];
        assert_eq!(write_i16(-2, &mut buf), Ok(2));
        assert_eq!(buf, [0xff, 0xfe]);
    }

    #[test]
    fn test_write_i32() {
        let mut buf = [0u8; 4];
        assert_eq!(write_i32(0x0102_0304, &mut buf), Ok(4));
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_write_i64() {
        let mut buf = [0u8; 8];
        assert_eq!(write_i64(i64::MIN, &mut buf), Ok(8));
        assert_eq!(buf, [0x80, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_writes_only_the_prefix() {
        let mut buf = [0xaa; 6];
        assert_eq!(write_i32(1, &mut buf), Ok(4));
        assert_eq!(buf, [0, 0, 0, 1, 0xaa, 0xaa]);
    }

    #[test]
    fn test_short_buffer() {
        let mut buf = [0u8; 3];
        assert_eq!(
            write_i64(1, &mut buf),
            Err(EncodeError::BufferTooSmall {
                needed: 8,
                available: 3
            })
        );
        assert_eq!(buf, [0, 0, 0]);
    }
}
