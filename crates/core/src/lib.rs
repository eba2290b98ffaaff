//! fmlping Core - Shared error type and wire constants

mod constants;
mod error;

pub use constants::*;
pub use error::*;
