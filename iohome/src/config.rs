//! Configuration file structure
//!
//! ```yaml
//! iohomecontrol:
//!   - id: radio
//!     node_id: 0xABCDEF
//!     system_key: "0123456789abcdef0123456789abcdef"
//!     frequency: 868.95
//!     mode: 1w
//!
//! cover:
//!   - name: Living Room Shutter
//!     node_id: 0x123456
//!     device_type: venetian_blind
//! ```
//!
//! Fields are kept as written here; [`crate::registry`] does the validation
//! so every problem can be reported with its location.

use std::{fmt, path::Path};

use compact_str::{CompactString, ToCompactString as _};
use iohome_common::{ComponentId, NodeId, radio::Mode};
use serde::{Deserialize, Serialize, de};

use crate::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub iohomecontrol: Vec<ControllerConfig>,
    #[serde(default)]
    pub cover: Vec<CoverConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    #[serde(default)]
    pub id: Option<ComponentId>,
    /// Address of the controller itself
    pub node_id: NodeIdLiteral,
    /// 16 bytes as 32 hex digits
    pub system_key: String,
    /// Radio frequency in MHz
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverConfig {
    #[serde(default)]
    pub id: Option<ComponentId>,
    #[serde(default)]
    pub name: Option<CompactString>,
    /// Controller to attach to, may be left out when only one is declared
    #[serde(default)]
    pub iohomecontrol_id: Option<ComponentId>,
    pub node_id: NodeIdLiteral,
    /// Defaults to `roller_shutter`
    #[serde(default)]
    pub device_type: Option<CompactString>,
}

/// A node id exactly as it was written in the file
///
/// YAML resolves integer tokens itself, so besides decimal and hex this also
/// takes its `0o` and `0b` forms. Integers beyond 128 bits are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeIdLiteral {
    Int(i128),
    Text(CompactString),
}

impl NodeIdLiteral {
    pub fn resolve(&self) -> iohome_common::Result<NodeId> {
        match self {
            NodeIdLiteral::Int(v) => NodeId::new(*v),
            NodeIdLiteral::Text(s) => s.parse(),
        }
    }
}

impl<'de> Deserialize<'de> for NodeIdLiteral {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = NodeIdLiteral;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a node id as a decimal or hex integer")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeIdLiteral, E> {
                Ok(NodeIdLiteral::Int(v.into()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeIdLiteral, E> {
                Ok(NodeIdLiteral::Int(v.into()))
            }

            fn visit_i128<E: de::Error>(self, v: i128) -> Result<NodeIdLiteral, E> {
                Ok(NodeIdLiteral::Int(v))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<NodeIdLiteral, E> {
                Ok(match i128::try_from(v) {
                    Ok(v) => NodeIdLiteral::Int(v),
                    Err(_) => NodeIdLiteral::Text(v.to_compact_string()),
                })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeIdLiteral, E> {
                Ok(NodeIdLiteral::Text(v.to_compact_string()))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

impl fmt::Display for NodeIdLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeIdLiteral::Int(v) => write!(f, "{v}"),
            NodeIdLiteral::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for NodeIdLiteral {
    fn from(value: i64) -> Self {
        NodeIdLiteral::Int(value.into())
    }
}

impl From<&str> for NodeIdLiteral {
    fn from(value: &str) -> Self {
        NodeIdLiteral::Text(value.to_compact_string())
    }
}

fn default_frequency() -> f32 {
    iohome_common::radio::Channel::Two.mhz()
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading configuration");

        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}
