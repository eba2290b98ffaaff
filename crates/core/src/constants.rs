//! Wire constants shared across the workspace

/// `modinfo.type` value advertised by FML1 servers.
pub const LEGACY_MOD_INFO_TYPE: &str = "FML";

/// `forgeData.fmlNetworkVersion` advertised by FML2 servers.
pub const FML2_NETWORK_VERSION: i64 = 2;

/// `forgeData.fmlNetworkVersion` advertised by FML3 servers.
pub const FML3_NETWORK_VERSION: i64 = 3;

/// Version recorded for mods the server flagged as server-side only.
pub const IGNORED_VERSION: &str = "IGNORED";

/// Longest VarInt the mod-list encoding allows, in bytes.
pub const MAX_VARINT_LEN: usize = 5;

/// Payload bits carried by each UTF-16 code unit of an encoded mod list.
pub const BITS_PER_CODE_UNIT: u32 = 15;

/// Mask selecting the payload bits of a code unit.
pub const CODE_UNIT_MASK: u32 = 0x7FFF;
