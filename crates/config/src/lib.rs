//! fmlping Configuration Management
//!
//! Loads handshake options from `forgeoptions.txt`, a `key = value` file with
//! `#` comments. Unknown keys are ignored and malformed values fall back to
//! their defaults.
//!
//! ```text
//! # Present these mods instead of the ones the server advertises
//! mods = forge, jei, create
//! # Channel pins announced during the handshake (name@version)
//! channels = jei:network@1, create:main@3
//! loglevel = debug
//! showversions = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fmlping_core::FmlError;
use fmlping_protocol::ForgeChannel;

/// Default location of the options file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/forgeoptions.txt";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for FmlError {
    fn from(err: ConfigError) -> Self {
        FmlError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Handshake configuration from forgeoptions.txt
#[derive(Debug, Clone, PartialEq)]
pub struct HandshakeConfig {
    /// Mods presented to the server instead of the advertised list (from "mods")
    pub mods: Option<Vec<String>>,
    /// Channels announced during the handshake (from "channels")
    pub channels: Vec<ForgeChannel>,
    /// Default tracing filter for the binary (from "loglevel")
    pub log_level: String,
    /// Print decoded mod versions (from "showversions")
    pub show_versions: bool,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            mods: None,
            channels: Vec::new(),
            log_level: "info".into(),
            show_versions: true,
        }
    }
}

impl HandshakeConfig {
    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Load configuration from [`DEFAULT_CONFIG_PATH`]
    pub fn load_default() -> Result<Self> {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    /// Parse forgeoptions.txt content
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                config.parse_option(key.trim(), value.trim());
            }
        }

        config
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key {
            "mods" => {
                let mods: Vec<String> = split_list(value).map(String::from).collect();
                self.mods = (!mods.is_empty()).then_some(mods);
            }
            "channels" => {
                self.channels = split_list(value).filter_map(parse_channel).collect();
            }
            "loglevel" => {
                if !value.is_empty() {
                    self.log_level = value.to_lowercase();
                }
            }
            "showversions" => {
                self.show_versions = value.parse().unwrap_or(true);
            }
            _ => {
                tracing::debug!("Unknown config option: {} = {}", key, value);
            }
        }
    }

    /// Display configuration summary
    pub fn display(&self) {
        tracing::info!("Handshake configuration:");
        match &self.mods {
            Some(mods) => tracing::info!("  Mods: {} pinned ({})", mods.len(), mods.join(", ")),
            None => tracing::info!("  Mods: advertised by server"),
        }
        if self.channels.is_empty() {
            tracing::info!("  Channels: advertised by server");
        } else {
            tracing::info!("  Channels: {} pinned", self.channels.len());
        }
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Show versions: {}", self.show_versions);
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Parse a `name@version` channel pin; a bare name gets an empty version
fn parse_channel(pin: &str) -> Option<ForgeChannel> {
    let (res, version) = pin.split_once('@').unwrap_or((pin, ""));
    let res = res.trim();
    if res.is_empty() {
        return None;
    }
    Some(ForgeChannel {
        res: res.into(),
        version: version.trim().into(),
        required: true,
    })
}
