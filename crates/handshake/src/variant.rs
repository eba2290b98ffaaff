//! Handshake variant classification
//!
//! A status response can carry fields from several Forge generations at once,
//! so the variants are checked in a fixed priority order and the first match
//! wins:
//!
//! | Priority | Variant        | Shape                                            |
//! |----------|----------------|--------------------------------------------------|
//! | 1        | `Legacy`       | `modinfo.type == "FML"`                          |
//! | 2        | `V2`           | `forgeData.fmlNetworkVersion == 2`               |
//! | 3        | `V3Plain`      | `forgeData.d` is set and `mods` is non-empty     |
//! | 4        | `V3Compressed` | `forgeData.fmlNetworkVersion == 3` and `d` is set |

use std::fmt;

use fmlping_core::{FML2_NETWORK_VERSION, FML3_NETWORK_VERSION, LEGACY_MOD_INFO_TYPE};
use fmlping_protocol::{decode_optimized, DecodedModList, ListedMod, StatusResponse};

use crate::options::HandshakeOptions;

/// Forge handshake shapes recognised in a status response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeVariant {
    /// FML1 `modinfo` block
    Legacy,
    /// FML2 `forgeData` with a flat mod list
    V2,
    /// FML3 `forgeData` whose flat mod list is filled in next to `d`
    V3Plain,
    /// FML3 `forgeData` with the mod list packed into `d`
    V3Compressed,
}

/// Outcome of classifying a status response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub variant: HandshakeVariant,
    pub options: HandshakeOptions,
    /// Full decoder output, only for [`HandshakeVariant::V3Compressed`]
    pub decoded: Option<DecodedModList>,
}

impl HandshakeVariant {
    /// Evaluation order; earlier entries win
    pub const PRIORITY: [HandshakeVariant; 4] = [
        HandshakeVariant::Legacy,
        HandshakeVariant::V2,
        HandshakeVariant::V3Plain,
        HandshakeVariant::V3Compressed,
    ];

    /// Find the first variant present in `response`
    pub fn classify(response: &StatusResponse) -> Option<Resolution> {
        Self::PRIORITY
            .iter()
            .find_map(|variant| variant.extract(response))
    }

    /// Whether `response` has this variant's shape
    pub fn matches(self, response: &StatusResponse) -> bool {
        match self {
            HandshakeVariant::Legacy => response
                .modinfo
                .as_ref()
                .is_some_and(|info| info.kind == LEGACY_MOD_INFO_TYPE),
            HandshakeVariant::V2 => response
                .forge_data
                .as_ref()
                .is_some_and(|forge| forge.fml_network_version == Some(FML2_NETWORK_VERSION)),
            HandshakeVariant::V3Plain => response
                .forge_data
                .as_ref()
                .is_some_and(|forge| forge.encoded().is_some() && !forge.mods().is_empty()),
            HandshakeVariant::V3Compressed => response.forge_data.as_ref().is_some_and(|forge| {
                forge.fml_network_version == Some(FML3_NETWORK_VERSION) && forge.encoded().is_some()
            }),
        }
    }

    /// Extract this variant's mod list, or `None` if the shape is absent
    pub fn extract(self, response: &StatusResponse) -> Option<Resolution> {
        if !self.matches(response) {
            return None;
        }

        let (options, decoded) = match self {
            HandshakeVariant::Legacy => {
                let info = response.modinfo.as_ref()?;
                (HandshakeOptions::new(info.mod_list.clone()), None)
            }
            HandshakeVariant::V2 | HandshakeVariant::V3Plain => {
                let forge = response.forge_data.as_ref()?;
                let options =
                    HandshakeOptions::new(forge.mods().to_vec()).with_channels(forge.channels.clone());
                (options, None)
            }
            HandshakeVariant::V3Compressed => {
                let encoded = response.forge_data.as_ref()?.encoded()?;
                let decoded = decode_optimized(encoded);
                if !decoded.is_complete() {
                    tracing::debug!(
                        "Mod list possibly truncated: {} of {} mods decoded",
                        decoded.entries.len(),
                        decoded.declared
                    );
                }
                let ids = decoded
                    .entries
                    .iter()
                    .map(|entry| ListedMod::Id(entry.id.clone()))
                    .collect();
                (HandshakeOptions::new(ids), Some(decoded))
            }
        };

        tracing::debug!("{} handshake with {} mods", self, options.forge_mods.len());
        Some(Resolution {
            variant: self,
            options,
            decoded,
        })
    }

    /// FML protocol generation spoken by this variant
    pub fn fml_version(self) -> u8 {
        match self {
            HandshakeVariant::Legacy => 1,
            HandshakeVariant::V2 => 2,
            HandshakeVariant::V3Plain | HandshakeVariant::V3Compressed => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandshakeVariant::Legacy => "legacy",
            HandshakeVariant::V2 => "v2",
            HandshakeVariant::V3Plain => "v3-plain",
            HandshakeVariant::V3Compressed => "v3-compressed",
        }
    }
}

impl fmt::Display for HandshakeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FML{} ({})", self.fml_version(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{encoded_mods, response};

    #[test]
    fn test_classify_legacy() {
        let resolution =
            HandshakeVariant::classify(&response(r#"{"modinfo":{"type":"FML","modList":["a","b"]}}"#))
                .unwrap();
        assert_eq!(resolution.variant, HandshakeVariant::Legacy);
        assert_eq!(resolution.options.mod_ids(), vec!["a", "b"]);
        assert!(resolution.decoded.is_none());
    }

    #[test]
    fn test_legacy_requires_fml_tag() {
        let status = response(r#"{"modinfo":{"type":"BUKKIT","modList":["a"]}}"#);
        assert!(!HandshakeVariant::Legacy.matches(&status));
        assert!(HandshakeVariant::classify(&status).is_none());
    }

    #[test]
    fn test_classify_v2_keeps_entries_as_is() {
        let resolution = HandshakeVariant::classify(&response(
            r#"{"forgeData":{"fmlNetworkVersion":2,"channels":[{"res":"fml:handshake","version":"1","required":true}],"mods":[{"modId":"forge","modmarker":"36.2.0"}]}}"#,
        ))
        .unwrap();

        assert_eq!(resolution.variant, HandshakeVariant::V2);
        assert_eq!(
            resolution.options.forge_mods,
            vec![ListedMod::Versioned { id: "forge".into(), version: "36.2.0".into() }]
        );
        assert_eq!(resolution.options.channels.len(), 1);
    }

    #[test]
    fn test_v2_without_mods() {
        let resolution =
            HandshakeVariant::classify(&response(r#"{"forgeData":{"fmlNetworkVersion":2}}"#)).unwrap();
        assert_eq!(resolution.variant, HandshakeVariant::V2);
        assert!(resolution.options.forge_mods.is_empty());
    }

    #[test]
    fn test_plain_list_preempts_compressed() {
        let d = encoded_mods(&[("m1", Some("1.0"))]);
        let json = serde_json::json!({
            "forgeData": { "fmlNetworkVersion": 3, "mods": ["listed"], "d": d }
        })
        .to_string();

        let resolution = HandshakeVariant::classify(&response(&json)).unwrap();
        assert_eq!(resolution.variant, HandshakeVariant::V3Plain);
        assert_eq!(resolution.options.mod_ids(), vec!["listed"]);
    }

    #[test]
    fn test_plain_list_ignores_version_tag() {
        let resolution = HandshakeVariant::classify(&response(r#"{"forgeData":{"mods":["x","y"],"d":"\u0000"}}"#))
            .unwrap();
        assert_eq!(resolution.variant, HandshakeVariant::V3Plain);
        assert_eq!(resolution.options.mod_ids(), vec!["x", "y"]);
    }

    #[test]
    fn test_plain_list_requires_payload() {
        for json in [
            r#"{"forgeData":{"fmlNetworkVersion":3,"mods":["p"]}}"#,
            r#"{"forgeData":{"fmlNetworkVersion":3,"mods":["p"],"d":""}}"#,
        ] {
            let status = response(json);
            assert!(!HandshakeVariant::V3Plain.matches(&status), "{}", json);
            assert!(HandshakeVariant::classify(&status).is_none(), "{}", json);
        }
    }

    #[test]
    fn test_classify_compressed() {
        let d = encoded_mods(&[("m1", Some("1.0")), ("m2", None)]);
        let json = serde_json::json!({
            "forgeData": { "fmlNetworkVersion": 3, "mods": [], "channels": [], "d": d }
        })
        .to_string();

        let resolution = HandshakeVariant::classify(&response(&json)).unwrap();
        assert_eq!(resolution.variant, HandshakeVariant::V3Compressed);
        assert_eq!(resolution.options.mod_ids(), vec!["m1", "m2"]);

        let decoded = resolution.decoded.unwrap();
        assert_eq!(decoded.entries[0].version, "1.0");
        assert_eq!(decoded.entries[1].version, "IGNORED");
    }

    #[test]
    fn test_compressed_requires_payload() {
        for json in [
            r#"{"forgeData":{"fmlNetworkVersion":3}}"#,
            r#"{"forgeData":{"fmlNetworkVersion":3,"d":""}}"#,
            r#"{"forgeData":{"fmlNetworkVersion":4,"d":"\u0000\u0000"}}"#,
        ] {
            assert!(HandshakeVariant::classify(&response(json)).is_none(), "{}", json);
        }
    }

    #[test]
    fn test_legacy_wins_over_v2() {
        let status = response(
            r#"{"modinfo":{"type":"FML","modList":["old"]},"forgeData":{"fmlNetworkVersion":2,"mods":["new"]}}"#,
        );
        assert!(HandshakeVariant::V2.matches(&status));

        let resolution = HandshakeVariant::classify(&status).unwrap();
        assert_eq!(resolution.variant, HandshakeVariant::Legacy);
        assert_eq!(resolution.options.mod_ids(), vec!["old"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(HandshakeVariant::V3Compressed.to_string(), "FML3 (v3-compressed)");
        assert_eq!(HandshakeVariant::Legacy.to_string(), "FML1 (legacy)");
    }
}
