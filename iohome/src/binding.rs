use iohome_common::{DeviceType, NodeId};
use serde::{Serialize, ser::SerializeStruct as _};

use crate::{Controller, Error, Result};

/// A cover attached to the controller that talks to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceBinding<'a> {
    node_id: NodeId,
    device_type: DeviceType,
    parent: &'a Controller,
}

/// Attaches a resolved cover to its controller.
///
/// A binding can't exist without a controller, so `None` is an error.
pub fn bind(
    node_id: NodeId,
    device_type: DeviceType,
    parent: Option<&Controller>,
) -> Result<DeviceBinding<'_>> {
    let parent = parent.ok_or(Error::MissingParent { requested: None })?;

    Ok(DeviceBinding { node_id, device_type, parent })
}

impl<'a> DeviceBinding<'a> {
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn parent(&self) -> &'a Controller {
        self.parent
    }

    pub fn traits(&self) -> CoverTraits {
        CoverTraits {
            position: true,
            tilt: false,
            assumed_state: !self.parent.mode.has_feedback(),
        }
    }

    pub fn dump_config(&self) {
        tracing::info!("  Node ID: {}", self.node_id.spaced());
        tracing::info!("  Device Type: 0x{:02X} ({})", self.device_type.code(), self.device_type);
        tracing::info!("  Controller: {}", self.parent.id);
    }
}

impl Serialize for DeviceBinding<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DeviceBinding", 4)?;
        s.serialize_field("node_id", &self.node_id.to_bytes())?;
        s.serialize_field("device_type", &self.device_type.code())?;
        s.serialize_field("parent", &self.parent.id)?;
        s.serialize_field("traits", &self.traits())?;
        s.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverTraits {
    pub position: bool,
    pub tilt: bool,
    /// State is whatever was last commanded, the actuator never reports back
    pub assumed_state: bool,
}
