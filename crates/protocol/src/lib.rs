//! # fmlping Protocol Library
//!
//! Wire-level pieces of the Forge status-ping extension.
//!
//! ## Architecture
//!
//! ### 1. Codecs ([`codecs`])
//! Cursor-based readers (and matching writers) for the mod-list buffer:
//! - VarInt: 7 bits per byte, continuation in bit 7, at most 5 bytes
//! - String: VarInt byte length followed by UTF-8
//!
//! ### 2. Optimized Encoding ([`optimized`])
//! The 15-bit-per-code-unit packing FML3 servers use for `forgeData.d`.
//!
//! ### 3. Mod List ([`mod_list`])
//! Best-effort decoder for the unpacked buffer, producing [`ModEntry`] values.
//!
//! ### 4. Status Documents ([`status`])
//! `serde` models of the status-ping JSON fields that carry mod information.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use fmlping_protocol::{decode_optimized, StatusResponse};
//!
//! let response = StatusResponse::from_json(r#"{"forgeData":{"fmlNetworkVersion":3,"d":"..."}}"#)?;
//! if let Some(encoded) = response.forge_data.as_ref().and_then(|f| f.encoded()) {
//!     for entry in decode_optimized(encoded).entries {
//!         println!("{}@{}", entry.id, entry.version);
//!     }
//! }
//! # Ok::<(), fmlping_core::FmlError>(())
//! ```

pub mod codecs;
pub mod error;
pub mod mod_list;
pub mod optimized;
pub mod status;

// Re-export commonly used items
pub use codecs::*;
pub use error::{CodecError, Result};
pub use mod_list::*;
pub use optimized::*;
pub use status::*;
