use std::fmt;

use hex::FromHex as _;
use iohome_common::{
    ComponentId, NodeId,
    radio::{Channel, Mode},
};
use serde::{Serialize, Serializer};

use crate::{Error, Result, config::ControllerConfig};

/// An io-homecontrol radio controller that covers attach to
///
/// Only its configuration lives here, the radio itself is driven elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controller {
    pub id: ComponentId,
    #[serde(serialize_with = "node_id_bytes")]
    pub node_id: NodeId,
    pub system_key: SystemKey,
    pub channel: Channel,
    pub mode: Mode,
    pub verbose: bool,
}

impl Controller {
    /// Default id for the controller declared at `index`
    pub fn default_id(index: usize) -> ComponentId {
        match index {
            0 => ComponentId::const_new("iohomecontrol"),
            n => format!("iohomecontrol_{n}").into(),
        }
    }

    /// Validates every field, returning all the problems found.
    pub fn from_config(index: usize, config: &ControllerConfig) -> Result<Self, Vec<Error>> {
        let path = |field: &str| format!("iohomecontrol[{index}].{field}");
        let mut errors = vec![];

        let node_id = config
            .node_id
            .resolve()
            .map_err(|err| errors.push(Error::from(err).at(path("node_id"))))
            .ok();

        let system_key = config
            .system_key
            .parse::<SystemKey>()
            .map_err(|err| errors.push(err.at(path("system_key"))))
            .ok();

        let channel = resolve_channel(config.frequency, config.mode)
            .map_err(|err| errors.push(err.at(path("frequency"))))
            .ok();

        match (node_id, system_key, channel) {
            (Some(node_id), Some(system_key), Some(channel)) if errors.is_empty() => Ok(Self {
                id: config.id.clone().unwrap_or_else(|| Self::default_id(index)),
                node_id,
                system_key,
                channel,
                mode: config.mode,
                verbose: config.verbose,
            }),
            _ => Err(errors),
        }
    }

    pub fn frequency(&self) -> f32 {
        self.channel.mhz()
    }

    pub fn dump_config(&self) {
        tracing::info!("io-homecontrol {}:", self.id);
        tracing::info!("  Node ID: {}", self.node_id.spaced());
        tracing::info!("  Frequency: {:.2} MHz", self.frequency());
        tracing::info!("  Mode: {}", self.mode);
        tracing::info!("  Verbose: {}", if self.verbose { "YES" } else { "NO" });
    }
}

fn resolve_channel(mhz: f32, mode: Mode) -> Result<Channel> {
    let channel = Channel::from_mhz(mhz).ok_or(Error::UnknownChannel { mhz })?;

    if !channel.supports(mode) {
        return Err(Error::OneWayChannel { mhz });
    }

    Ok(channel)
}

pub(crate) fn node_id_bytes<S: Serializer>(id: &NodeId, serializer: S) -> Result<S::Ok, S::Error> {
    id.to_bytes().serialize(serializer)
}

/// AES-128 key shared by every device in the system
#[derive(Clone, PartialEq, Eq)]
pub struct SystemKey([u8; 16]);

impl SystemKey {
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl std::str::FromStr for SystemKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(<[u8; 16]>::from_hex(s.trim())?))
    }
}

// never print the key itself
impl fmt::Debug for SystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SystemKey(..)")
    }
}

impl Serialize for SystemKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}
