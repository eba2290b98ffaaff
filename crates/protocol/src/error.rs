//! Error types for the protocol crate

use fmlping_core::{FmlError, MAX_VARINT_LEN};

/// Errors raised while reading the FML3 mod-list encoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// More than [`MAX_VARINT_LEN`] bytes carried the continuation bit
    #[error("VarInt at offset {offset} is longer than {} bytes", MAX_VARINT_LEN)]
    MalformedVarInt { offset: usize },

    /// A fixed-size read ran past the end of the buffer
    #[error("Read of {needed} byte(s) at offset {offset} exceeds buffer length {len}")]
    TruncatedBuffer { offset: usize, needed: usize, len: usize },

    /// A string's declared length runs past the end of the buffer
    #[error("String of length {length} at offset {offset} exceeds buffer length {len}")]
    TruncatedString { offset: usize, length: u64, len: usize },

    /// Decoding of a mod record failed and the mod loop stopped
    #[error("Decoding aborted at mod {index}: {source}")]
    DecodeAborted {
        index: usize,
        #[source]
        source: Box<CodecError>,
    },
}

impl From<CodecError> for FmlError {
    fn from(err: CodecError) -> Self {
        FmlError::InvalidData(err.to_string())
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
