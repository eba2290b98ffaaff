//! # fmlping Handshake Negotiation
//!
//! Decides which Forge handshake a server expects from its status-ping
//! response and hands the server's mod list to the matching installer.
//!
//! ## Flow
//!
//! ```text
//! StatusResponse
//!   -> HandshakeVariant::classify   (legacy > v2 > v3-plain > v3-compressed)
//!        flat list  -> used as-is
//!        forgeData.d -> unpack -> decode -> ids
//!   -> HandshakeRegistry::dispatch  -> HandshakeInstaller::install(conn, options)
//! ```
//!
//! Servers without Forge data are not an error: `dispatch` returns `None` and
//! the connection continues as a vanilla one.

pub mod options;
pub mod registry;
pub mod variant;

pub use options::HandshakeOptions;
pub use registry::{HandshakeInstaller, HandshakeRegistry, InstallerHandle};
pub use variant::{HandshakeVariant, Resolution};
