//! FML3 mod-list decoder
//!
//! # Buffer Layout
//!
//! ```text
//! [u8 truncated][u16 BE mod count][mod record]*
//!
//! mod record:
//!   VarInt  channel_count << 1 | server_only
//!   String  mod id
//!   String  mod version        (absent when server_only)
//!   channel_count x [String name][String version][u8 required]
//! ```
//!
//! Decoding is best effort. A record that cannot be read stops the loop and the
//! mods decoded before it are returned; the error is only logged. A short list
//! therefore means "possibly truncated", never "failed".

use fmlping_core::IGNORED_VERSION;
use crate::codecs::{read_string, read_u8, read_varint};
use crate::error::{CodecError, Result};
use crate::optimized::unpack;

/// Mod id and version advertised by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModEntry {
    pub id: String,
    /// `"IGNORED"` for server-side-only mods
    pub version: String,
}

impl ModEntry {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }

    /// Whether the server flagged this mod as server-side only
    #[inline]
    pub fn is_server_only(&self) -> bool {
        self.version == IGNORED_VERSION
    }
}

/// Result of decoding an FML3 mod-list buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedModList {
    /// Truncated flag written by the server (not used for decoding)
    pub truncated: bool,
    /// Mod count from the buffer header
    pub declared: usize,
    /// Mods in buffer order
    pub entries: Vec<ModEntry>,
}

impl DecodedModList {
    /// True when the server did not truncate and every declared mod decoded
    pub fn is_complete(&self) -> bool {
        !self.truncated && self.entries.len() == self.declared
    }

    /// Mod ids in buffer order
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }
}

/// Decode an unpacked mod-list buffer
pub fn decode_mod_list(buf: &[u8]) -> DecodedModList {
    // Missing header bytes read as 0; a missing flag byte reads as truncated.
    let truncated = buf.first().map_or(true, |flag| *flag != 0);
    let declared = u16::from_be_bytes([
        buf.get(1).copied().unwrap_or(0),
        buf.get(2).copied().unwrap_or(0),
    ]) as usize;
    tracing::debug!("Mod list header: truncated={}, declared={}", truncated, declared);

    let mut entries = Vec::with_capacity(declared.min(buf.len()));
    let mut offset = 3;

    for index in 0..declared {
        match read_mod_record(buf, offset) {
            Ok((entry, consumed)) => {
                tracing::debug!("Mod {}: {}@{}", index, entry.id, entry.version);
                entries.push(entry);
                offset += consumed;
            }
            Err(source) => {
                let err = CodecError::DecodeAborted {
                    index,
                    source: Box::new(source),
                };
                tracing::debug!("{}", err);
                break;
            }
        }
    }

    tracing::debug!("Decoded {} of {} mods", entries.len(), declared);
    DecodedModList {
        truncated,
        declared,
        entries,
    }
}

/// Decode an unpacked mod-list buffer, keeping only the entries
#[inline]
pub fn decode_mods(buf: &[u8]) -> Vec<ModEntry> {
    decode_mod_list(buf).entries
}

/// Unpack a `forgeData.d` string and decode the mod list it carries
pub fn decode_optimized(encoded: &str) -> DecodedModList {
    tracing::debug!("Decoding optimized data of {} chars", encoded.chars().count());
    let buf = unpack(encoded);
    tracing::debug!("Unpacked {} bytes", buf.len());
    decode_mod_list(&buf)
}

/// Read one mod record, returning the entry and the bytes consumed
fn read_mod_record(buf: &[u8], start: usize) -> Result<(ModEntry, usize)> {
    let mut offset = start;

    let (flagged, read) = read_varint(buf, offset)?;
    offset += read;
    let channel_count = flagged >> 1;
    let server_only = flagged & 1 != 0;

    let (id, read) = read_string(buf, offset)?;
    offset += read;

    let version = if server_only {
        IGNORED_VERSION.to_string()
    } else {
        let (version, read) = read_string(buf, offset)?;
        offset += read;
        version
    };

    for _ in 0..channel_count {
        offset += skip_channel(buf, offset)?;
    }

    Ok((ModEntry { id, version }, offset - start))
}

/// Skip a channel record (name, version, required flag)
///
/// A missing required flag is a truncated buffer like any other short read, so
/// the owning mod is dropped. Clients that step over the flag unchecked keep
/// that mod instead.
fn skip_channel(buf: &[u8], start: usize) -> Result<usize> {
    let mut offset = start;
    offset += read_string(buf, offset)?.1;
    offset += read_string(buf, offset)?.1;
    offset += read_u8(buf, offset)?.1;
    Ok(offset - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::{write_string, write_varint};
    use crate::optimized::pack;
    use bytes::{BufMut, BytesMut};

    struct Channel(&'static str, &'static str, bool);

    fn put_mod(buf: &mut BytesMut, id: &str, version: Option<&str>, channels: &[Channel]) {
        let flag = u64::from(version.is_none());
        write_varint(buf, (channels.len() as u64) << 1 | flag);
        write_string(buf, id);
        if let Some(version) = version {
            write_string(buf, version);
        }
        for Channel(name, version, required) in channels {
            write_string(buf, name);
            write_string(buf, version);
            buf.put_u8(u8::from(*required));
        }
    }

    fn header(truncated: bool, count: u16) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u8(u8::from(truncated));
        buf.put_u16(count);
        buf
    }

    fn sample_buffer() -> BytesMut {
        let mut buf = header(false, 3);
        put_mod(&mut buf, "forge", Some("47.2.0"), &[Channel("forge:handshake", "1", true)]);
        put_mod(
            &mut buf,
            "create",
            Some("0.5.1.f"),
            &[Channel("create:main", "3", true), Channel("create:aux", "1", false)],
        );
        put_mod(&mut buf, "spark", None, &[]);
        buf
    }

    #[test]
    fn test_decode_two_mods() {
        let mut buf = header(false, 2);
        put_mod(&mut buf, "m1", Some("1.0"), &[]);
        put_mod(&mut buf, "m2", None, &[Channel("m2:net", "2", false)]);

        let decoded = decode_mod_list(&buf);
        assert_eq!(
            decoded.entries,
            vec![ModEntry::new("m1", "1.0"), ModEntry::new("m2", "IGNORED")]
        );
        assert!(decoded.is_complete());
        assert!(decoded.entries[1].is_server_only());
    }

    #[test]
    fn test_decode_skips_channels() {
        let decoded = decode_mod_list(&sample_buffer());
        assert_eq!(decoded.ids(), vec!["forge", "create", "spark"]);
        assert_eq!(decoded.entries[1].version, "0.5.1.f");
        assert_eq!(decoded.entries[2].version, IGNORED_VERSION);
    }

    #[test]
    fn test_decode_preserves_order_and_duplicates() {
        let mut buf = header(false, 3);
        put_mod(&mut buf, "b", Some("1"), &[]);
        put_mod(&mut buf, "a", Some("1"), &[]);
        put_mod(&mut buf, "b", Some("2"), &[]);

        assert_eq!(
            decode_mods(&buf),
            vec![ModEntry::new("b", "1"), ModEntry::new("a", "1"), ModEntry::new("b", "2")]
        );
    }

    #[test]
    fn test_decode_truncated_at_every_length() {
        let full = sample_buffer();
        let complete = decode_mods(&full);
        let mut previous = 0;

        for cut in 0..full.len() {
            let entries = decode_mods(&full[..cut]);
            assert!(entries.len() < complete.len(), "cut {}", cut);
            assert_eq!(&complete[..entries.len()], &entries[..], "cut {}", cut);
            assert!(entries.len() >= previous, "cut {}", cut);
            previous = entries.len();
        }
    }

    #[test]
    fn test_decode_stops_at_malformed_varint() {
        let mut buf = header(false, 2);
        put_mod(&mut buf, "ok", Some("1"), &[]);
        buf.put_slice(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00]);

        let decoded = decode_mod_list(&buf);
        assert_eq!(decoded.entries, vec![ModEntry::new("ok", "1")]);
        assert!(!decoded.is_complete());
    }

    #[test]
    fn test_decode_declared_more_than_present() {
        let mut buf = header(true, 5);
        put_mod(&mut buf, "only", Some("1"), &[]);

        let decoded = decode_mod_list(&buf);
        assert!(decoded.truncated);
        assert_eq!(decoded.declared, 5);
        assert_eq!(decoded.ids(), vec!["only"]);
    }

    #[test]
    fn test_decode_drops_mod_missing_required_flag() {
        let mut buf = header(false, 2);
        put_mod(&mut buf, "first", Some("1"), &[]);
        put_mod(&mut buf, "last", Some("2"), &[Channel("last:net", "1", true)]);
        let cut = buf.len() - 1;

        let decoded = decode_mod_list(&buf[..cut]);
        assert_eq!(decoded.ids(), vec!["first"]);
        assert!(!decoded.is_complete());
    }

    #[test]
    fn test_decode_empty_buffer() {
        let decoded = decode_mod_list(&[]);
        assert!(decoded.entries.is_empty());
        assert_eq!(decoded.declared, 0);
    }

    #[test]
    fn test_decode_optimized() {
        let mut buf = header(false, 2);
        put_mod(&mut buf, "m1", Some("1.0"), &[]);
        put_mod(&mut buf, "m2", None, &[]);

        let decoded = decode_optimized(&pack(&buf));
        assert_eq!(
            decoded.entries,
            vec![ModEntry::new("m1", "1.0"), ModEntry::new("m2", "IGNORED")]
        );
    }

    #[test]
    fn test_decode_optimized_garbage() {
        let decoded = decode_optimized("not an encoded payload");
        assert!(decoded.entries.len() <= decoded.declared);
    }
}
