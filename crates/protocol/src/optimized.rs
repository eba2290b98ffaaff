//! 15-bit packed string encoding used by FML3 status pings
//!
//! FML3 servers squeeze the binary mod list into the JSON `forgeData.d` field by
//! storing 15 payload bits in every UTF-16 code unit. The first two code units
//! hold the decoded byte length (low 15 bits, then the bits above).
//!
//! The unpacker matches existing Forge-aware clients bit for bit, including their
//! habit of draining leftover accumulator bits once the input is exhausted:
//! when the declared length asks for more bytes than the payload carries, the
//! tail is filled from whatever remains in the accumulator (usually zeros).

use bytes::{BufMut, Bytes, BytesMut};
use fmlping_core::{BITS_PER_CODE_UNIT, CODE_UNIT_MASK};

/// Byte length declared by the two header code units
///
/// Each unit contributes its low 15 bits, so the length is below 2^30. A
/// missing header code unit counts as zero.
#[inline]
pub fn declared_len(encoded: &str) -> usize {
    let mut units = encoded.encode_utf16().map(|unit| u32::from(unit) & CODE_UNIT_MASK);
    let low = units.next().unwrap_or(0) as usize;
    let high = units.next().unwrap_or(0) as usize;
    low | (high << BITS_PER_CODE_UNIT)
}

/// Unpack an encoded string into exactly [`declared_len`] bytes
///
/// Never fails. Bytes produced beyond the declared length are dropped, and
/// bytes missing from the payload are drained from the accumulator.
pub fn unpack(encoded: &str) -> Bytes {
    let size = declared_len(encoded);
    let payload_units = encoded.encode_utf16().count().saturating_sub(2);
    tracing::debug!("Unpacking {} code units into {} bytes", payload_units, size);

    let mut out = BytesMut::with_capacity(size.min(payload_units * 2 + 1));
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;

    for unit in encoded.encode_utf16().skip(2) {
        while bits >= 8 {
            if out.len() < size {
                out.put_u8(acc as u8);
            }
            acc >>= 8;
            bits -= 8;
        }

        acc |= (u32::from(unit) & CODE_UNIT_MASK) << bits;
        bits += BITS_PER_CODE_UNIT;
    }

    while out.len() < size {
        out.put_u8(acc as u8);
        acc >>= 8;
    }

    out.freeze()
}

/// Pack bytes the way an FML3 server does
///
/// Inverse of [`unpack`]: emits the length header, then one code unit for
/// every 15 accumulated bits, flushing any remainder at the end.
pub fn pack(data: &[u8]) -> String {
    let len = data.len() as u32;
    let mut out = String::with_capacity(2 + (data.len() * 8).div_ceil(15) * 3);
    push_unit(&mut out, len & CODE_UNIT_MASK);
    push_unit(&mut out, (len >> BITS_PER_CODE_UNIT) & CODE_UNIT_MASK);

    let mut acc: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        acc |= u32::from(byte) << bits;
        bits += 8;

        while bits >= BITS_PER_CODE_UNIT {
            push_unit(&mut out, acc & CODE_UNIT_MASK);
            acc >>= BITS_PER_CODE_UNIT;
            bits -= BITS_PER_CODE_UNIT;
        }
    }

    if bits > 0 {
        push_unit(&mut out, acc & CODE_UNIT_MASK);
    }

    out
}

// 15-bit values never reach the surrogate range, so every unit is a char.
#[inline]
fn push_unit(out: &mut String, unit: u32) {
    out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
}
