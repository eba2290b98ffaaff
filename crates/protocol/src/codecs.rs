//! VarInt and string codecs for the FML3 mod-list buffer
//!
//! Readers are cursor based: each takes the buffer and an absolute offset and
//! returns the decoded value together with the number of bytes it consumed.
//! Callers own the offset and advance it themselves.

use bytes::{BufMut, BytesMut};
use fmlping_core::MAX_VARINT_LEN;

use crate::error::{CodecError, Result};

/// Read a VarInt
///
/// # Format
/// - 7 payload bits per byte, least significant group first
/// - Bit 7 set means another byte follows
/// - At most [`MAX_VARINT_LEN`] bytes
///
/// # Returns
/// `(value, bytes_consumed)`
#[inline]
pub fn read_varint(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut read = 0usize;

    loop {
        let byte = *buf.get(offset + read).ok_or(CodecError::TruncatedBuffer {
            offset: offset + read,
            needed: 1,
            len: buf.len(),
        })?;

        if read == MAX_VARINT_LEN {
            return Err(CodecError::MalformedVarInt { offset });
        }

        value |= u64::from(byte & 0x7F) << (7 * read);
        read += 1;

        if byte & 0x80 == 0 {
            return Ok((value, read));
        }
    }
}

/// Write a VarInt
///
/// Values wider than 35 bits cannot be read back by [`read_varint`].
#[inline]
pub fn write_varint(buf: &mut BytesMut, mut val: u64) {
    loop {
        let byte = (val & 0x7F) as u8;
        val >>= 7;
        if val == 0 {
            buf.put_u8(byte);
            return;
        }
        buf.put_u8(byte | 0x80);
    }
}

/// Read a length-prefixed string
///
/// # Format
/// - VarInt: byte length
/// - UTF-8 bytes; invalid sequences decode to U+FFFD
///
/// # Returns
/// `(value, varint_bytes + string_bytes)`
#[inline]
pub fn read_string(buf: &[u8], offset: usize) -> Result<(String, usize)> {
    let (length, prefix) = read_varint(buf, offset)?;
    let start = offset + prefix;

    let end = (start as u64)
        .checked_add(length)
        .filter(|end| *end <= buf.len() as u64)
        .ok_or(CodecError::TruncatedString {
            offset: start,
            length,
            len: buf.len(),
        })? as usize;

    let value = String::from_utf8_lossy(&buf[start..end]).into_owned();
    Ok((value, prefix + (end - start)))
}

/// Write a length-prefixed string
#[inline]
pub fn write_string(buf: &mut BytesMut, val: &str) {
    write_varint(buf, val.len() as u64);
    buf.put_slice(val.as_bytes());
}

/// Read a single byte
#[inline]
pub fn read_u8(buf: &[u8], offset: usize) -> Result<(u8, usize)> {
    buf.get(offset)
        .map(|byte| (*byte, 1))
        .ok_or(CodecError::TruncatedBuffer {
            offset,
            needed: 1,
            len: buf.len(),
        })
}
