//! fmlping - inspect the Forge handshake a server advertises
//!
//! Reads a saved status-ping JSON document from a file (or stdin), works out
//! which Forge handshake the server expects and prints the mod list a client
//! would present to it.
//!
//! ```text
//! fmlping status.json
//! curl -s ... | fmlping
//! ```

use fmlping_config::{HandshakeConfig, DEFAULT_CONFIG_PATH};
use fmlping_core::Result;
use fmlping_handshake::{HandshakeInstaller, HandshakeOptions, HandshakeRegistry, HandshakeVariant, Resolution};
use fmlping_protocol::StatusResponse;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Connection stand-in that records what the installer was handed
#[derive(Debug, Default)]
struct Inspection {
    installed: Option<(HandshakeVariant, HandshakeOptions)>,
}

/// Installer that records instead of talking to a server
struct Recording(HandshakeVariant);

impl HandshakeInstaller<Inspection> for Recording {
    fn install(&self, conn: &mut Inspection, options: HandshakeOptions) {
        conn.installed = Some((self.0, options));
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Config first: it carries the default log level
    let (config, config_error) = match HandshakeConfig::load_default() {
        Ok(config) => (config, None),
        Err(e) => (HandshakeConfig::default(), Some(e)),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match config_error {
        None => info!("Loaded configuration from {}", DEFAULT_CONFIG_PATH),
        Some(e) => {
            warn!("{}", e);
            warn!("Using default configuration");
        }
    }
    config.display();

    let path = std::env::args().nth(1);
    let json = read_input(path.as_deref()).await?;
    let response = StatusResponse::from_json(&json)?;

    if let Some(version) = &response.version {
        info!("Server version {} (protocol {})", version.name, version.protocol);
    }

    let registry = build_registry(&config);
    let mut inspection = Inspection::default();
    let resolution = registry.dispatch(&response, &mut inspection);
    if let Some((variant, _)) = &inspection.installed {
        info!("Installed {} handshake", variant);
    }

    for line in render(resolution.as_ref(), &config) {
        println!("{}", line);
    }

    Ok(())
}

async fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            info!("Reading status response from {}", path);
            Ok(tokio::fs::read_to_string(path).await?)
        }
        None => {
            info!("Reading status response from stdin");
            let mut json = String::new();
            tokio::io::stdin().read_to_string(&mut json).await?;
            Ok(json)
        }
    }
}

fn build_registry(config: &HandshakeConfig) -> HandshakeRegistry<Inspection> {
    let mut registry = HandshakeRegistry::new();
    for variant in HandshakeVariant::PRIORITY {
        registry.register(variant, Recording(variant));
    }

    let registry = match &config.mods {
        Some(mods) => registry.with_mod_override(mods.clone()),
        None => registry,
    };
    registry.with_channel_override(config.channels.clone())
}

fn render(resolution: Option<&Resolution>, config: &HandshakeConfig) -> Vec<String> {
    let Some(resolution) = resolution else {
        return vec!["No Forge handshake data: vanilla server".to_string()];
    };
    let options = &resolution.options;

    let mut lines = vec![
        format!("Handshake: {}", resolution.variant),
        format!("Mods ({}):", options.forge_mods.len()),
    ];

    // Compressed lists reach the installer as ids; versions come from the decoder output.
    let decoded = resolution
        .decoded
        .as_ref()
        .filter(|_| config.show_versions && config.mods.is_none());

    match decoded {
        Some(decoded) => {
            for entry in &decoded.entries {
                lines.push(format!("  {}@{}", entry.id, entry.version));
            }
            if !decoded.is_complete() {
                lines.push(format!(
                    "  (possibly truncated: {} of {} declared)",
                    decoded.entries.len(),
                    decoded.declared
                ));
            }
        }
        None => {
            for listed in &options.forge_mods {
                match listed.version().filter(|_| config.show_versions) {
                    Some(version) => lines.push(format!("  {}@{}", listed.id(), version)),
                    None => lines.push(format!("  {}", listed.id())),
                }
            }
        }
    }

    if !options.channels.is_empty() {
        lines.push(format!("Channels ({}):", options.channels.len()));
        for channel in &options.channels {
            lines.push(format!("  {}@{}", channel.res, channel.version));
        }
    }

    lines
}
