//! Status-ping response documents
//!
//! Only the fields the handshake negotiation reads are modelled; everything
//! else in the server's status JSON is ignored on deserialization.

use fmlping_core::Result;
use serde::{Deserialize, Serialize};

/// Status-ping response as sent by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ServerVersion>,

    /// FML1 mod block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modinfo: Option<ModInfo>,

    /// FML2 / FML3 mod block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forge_data: Option<ForgeData>,
}

impl StatusResponse {
    /// Parse a status-ping JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub name: String,
    pub protocol: i64,
}

/// FML1 `modinfo` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModInfo {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(rename = "modList", default)]
    pub mod_list: Vec<ListedMod>,
}

/// FML2 / FML3 `forgeData` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fml_network_version: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mods: Option<Vec<ListedMod>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ForgeChannel>,

    /// 15-bit packed mod list (FML3)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

impl ForgeData {
    /// Flat mod list, empty when absent
    pub fn mods(&self) -> &[ListedMod] {
        self.mods.as_deref().unwrap_or_default()
    }

    /// Encoded mod list, if present and non-empty
    pub fn encoded(&self) -> Option<&str> {
        self.d.as_deref().filter(|d| !d.is_empty())
    }
}

/// Channel advertised in an FML2 `forgeData.channels` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeChannel {
    /// Channel resource location
    pub res: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub required: bool,
}

/// One element of a flat mod list
///
/// Servers send either bare ids or objects (`modid`/`version` for FML1,
/// `modId`/`modmarker` for FML2). Either shape is kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListedMod {
    Id(String),
    Versioned {
        #[serde(rename = "modid", alias = "modId")]
        id: String,
        #[serde(rename = "version", alias = "modmarker", default)]
        version: String,
    },
}

impl ListedMod {
    /// Mod id regardless of shape
    pub fn id(&self) -> &str {
        match self {
            ListedMod::Id(id) => id,
            ListedMod::Versioned { id, .. } => id,
        }
    }

    /// Advertised version, if the server sent one
    pub fn version(&self) -> Option<&str> {
        match self {
            ListedMod::Id(_) => None,
            ListedMod::Versioned { version, .. } => Some(version),
        }
    }
}

impl From<&str> for ListedMod {
    fn from(id: &str) -> Self {
        ListedMod::Id(id.to_string())
    }
}

impl From<String> for ListedMod {
    fn from(id: String) -> Self {
        ListedMod::Id(id)
    }
}
