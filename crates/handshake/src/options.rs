//! Options handed to a handshake installer

use fmlping_protocol::{ForgeChannel, ListedMod};

/// Mod list (and channels) a handshake installer should present to the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeOptions {
    /// Mods in the order the server advertised them
    pub forge_mods: Vec<ListedMod>,
    /// Channels to announce; empty when the server did not list any
    pub channels: Vec<ForgeChannel>,
}

impl HandshakeOptions {
    pub fn new(forge_mods: Vec<ListedMod>) -> Self {
        Self {
            forge_mods,
            channels: Vec::new(),
        }
    }

    #[inline]
    pub fn with_channels(mut self, channels: Vec<ForgeChannel>) -> Self {
        self.channels = channels;
        self
    }

    /// Mod ids in list order
    pub fn mod_ids(&self) -> Vec<&str> {
        self.forge_mods.iter().map(ListedMod::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_ids_mixed_shapes() {
        let options = HandshakeOptions::new(vec![
            ListedMod::from("minecraft"),
            ListedMod::Versioned {
                id: "forge".into(),
                version: "36.2.0".into(),
            },
        ]);
        assert_eq!(options.mod_ids(), vec!["minecraft", "forge"]);
        assert!(options.channels.is_empty());
    }
}
