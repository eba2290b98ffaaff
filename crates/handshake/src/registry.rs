//! # Handshake Installer Registry
//!
//! Maps each [`HandshakeVariant`] to the installer that performs that
//! generation's packet exchange. The registry is built once per client and
//! consulted once per connection attempt, when the status response arrives.
//!
//! # Example
//!
//! ```no_run
//! use fmlping_handshake::{HandshakeRegistry, HandshakeVariant};
//! use fmlping_protocol::StatusResponse;
//!
//! struct Connection;
//!
//! let mut registry = HandshakeRegistry::<Connection>::new();
//! registry.register_function(HandshakeVariant::V2, |_conn, options| {
//!     println!("FML2 with {} mods", options.forge_mods.len());
//! });
//!
//! let response = StatusResponse::from_json(r#"{"forgeData":{"fmlNetworkVersion":2,"mods":["x"]}}"#)?;
//! registry.dispatch(&response, &mut Connection);
//! # Ok::<(), fmlping_core::FmlError>(())
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use fmlping_protocol::{ForgeChannel, ListedMod, StatusResponse};

use crate::options::HandshakeOptions;
use crate::variant::{HandshakeVariant, Resolution};

/// Performs a Forge handshake on a connection
///
/// `C` is whatever handle the client uses for a connection attempt.
pub trait HandshakeInstaller<C>: Send + Sync {
    fn install(&self, conn: &mut C, options: HandshakeOptions);
}

struct FnInstaller<F>(F);

impl<C, F> HandshakeInstaller<C> for FnInstaller<F>
where
    F: Fn(&mut C, HandshakeOptions) + Send + Sync,
{
    fn install(&self, conn: &mut C, options: HandshakeOptions) {
        (self.0)(conn, options)
    }
}

/// Shared installer handle
pub type InstallerHandle<C> = Arc<dyn HandshakeInstaller<C>>;

/// Registry of handshake installers
pub struct HandshakeRegistry<C> {
    installers: HashMap<HandshakeVariant, InstallerHandle<C>>,
    /// Replaces the discovered mod list when set
    mod_override: Option<Vec<String>>,
    /// Replaces the discovered channels when non-empty
    channel_override: Vec<ForgeChannel>,
}

impl<C> HandshakeRegistry<C> {
    /// Create an empty registry
    #[inline]
    pub fn new() -> Self {
        Self {
            installers: HashMap::new(),
            mod_override: None,
            channel_override: Vec::new(),
        }
    }

    /// Register an installer for one variant
    pub fn register<I>(&mut self, variant: HandshakeVariant, installer: I)
    where
        I: HandshakeInstaller<C> + 'static,
    {
        self.register_handle(variant, Arc::new(installer));
    }

    /// Register a closure as the installer for one variant
    pub fn register_function<F>(&mut self, variant: HandshakeVariant, installer: F)
    where
        F: Fn(&mut C, HandshakeOptions) + Send + Sync + 'static,
    {
        self.register_handle(variant, Arc::new(FnInstaller(installer)));
    }

    /// Register one installer for both FML3 variants
    pub fn register_fml3<I>(&mut self, installer: I)
    where
        I: HandshakeInstaller<C> + 'static,
    {
        let handle: InstallerHandle<C> = Arc::new(installer);
        self.register_handle(HandshakeVariant::V3Plain, handle.clone());
        self.register_handle(HandshakeVariant::V3Compressed, handle);
    }

    fn register_handle(&mut self, variant: HandshakeVariant, handle: InstallerHandle<C>) {
        tracing::debug!("Registered installer for {}", variant);
        self.installers.insert(variant, handle);
    }

    /// Hand `mods` to installers instead of the list the server advertised
    pub fn with_mod_override(mut self, mods: Vec<String>) -> Self {
        self.mod_override = Some(mods);
        self
    }

    /// Hand `channels` to installers instead of the ones the server advertised
    pub fn with_channel_override(mut self, channels: Vec<ForgeChannel>) -> Self {
        self.channel_override = channels;
        self
    }

    /// Check if an installer is registered for a variant
    pub fn has_installer(&self, variant: HandshakeVariant) -> bool {
        self.installers.contains_key(&variant)
    }

    /// Get the number of registered variants
    pub fn installer_count(&self) -> usize {
        self.installers.len()
    }

    /// Classify `response` and run the matching installer on `conn`
    ///
    /// # Returns
    /// - `Some(resolution)` - the first variant present in the response, with
    ///   the options the installer received (overrides applied)
    /// - `None` - no Forge data; nothing was installed
    ///
    /// A matched variant without a registered installer is logged and still
    /// returned; lower-priority variants are not tried.
    pub fn dispatch(&self, response: &StatusResponse, conn: &mut C) -> Option<Resolution> {
        let Some(mut resolution) = HandshakeVariant::classify(response) else {
            tracing::debug!("No Forge handshake data in status response");
            return None;
        };

        let variant = resolution.variant;
        resolution.options = self.apply_overrides(resolution.options);

        match self.installers.get(&variant) {
            Some(installer) => {
                let options = &resolution.options;
                tracing::info!("Using {} mods for {}: {:?}", options.forge_mods.len(), variant, options.mod_ids());
                installer.install(conn, options.clone());
            }
            None => {
                tracing::warn!("No installer registered for {}", variant);
            }
        }

        Some(resolution)
    }

    fn apply_overrides(&self, mut options: HandshakeOptions) -> HandshakeOptions {
        if let Some(mods) = &self.mod_override {
            tracing::debug!("Overriding advertised mod list with {} configured mods", mods.len());
            options.forge_mods = mods.iter().cloned().map(ListedMod::Id).collect();
        }
        if !self.channel_override.is_empty() {
            options.channels = self.channel_override.clone();
        }
        options
    }
}

impl<C> Default for HandshakeRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
