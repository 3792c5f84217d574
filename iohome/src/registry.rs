use std::collections::HashSet;

use compact_str::CompactString;
use heck::ToSnakeCase as _;
use iohome_common::{ComponentId, DeviceType};
use serde::Serialize;

use crate::{
    Controller, DeviceBinding, Error, Result, bind,
    config::{Config, CoverConfig},
};

/// Every controller declared in a configuration, validated
pub struct Registry {
    controllers: Vec<Controller>,
}

/// Output of a fully resolved configuration
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub controllers: &'a [Controller],
    pub covers: Vec<Cover<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cover<'a> {
    pub id: ComponentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<CompactString>,
    #[serde(flatten)]
    pub binding: DeviceBinding<'a>,
}

impl Registry {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut controllers = vec![];
        let mut errors = vec![];

        for (index, controller) in config.iohomecontrol.iter().enumerate() {
            match Controller::from_config(index, controller) {
                Ok(controller) => controllers.push(controller),
                Err(errs) => errors.extend(errs),
            }
        }

        let mut seen = HashSet::new();
        for controller in &controllers {
            if !seen.insert(&controller.id) {
                errors.push(Error::DuplicateId(controller.id.clone()));
            }
        }

        if !errors.is_empty() {
            return Err(Error::Invalid(errors));
        }

        for controller in &controllers {
            tracing::debug!(id = %controller.id, node_id = %controller.node_id, "Registered controller");
        }

        Ok(Self { controllers })
    }

    pub fn controller(&self, id: &ComponentId) -> Option<&Controller> {
        self.controllers.iter().find(|c| &c.id == id)
    }

    /// Picks the controller a cover attaches to.
    ///
    /// Without an explicit id the only declared controller is used.
    pub fn parent(&self, requested: Option<&ComponentId>) -> Result<Option<&Controller>> {
        match (requested, self.controllers.as_slice()) {
            (Some(id), _) => Ok(self.controller(id)),
            (None, [only]) => Ok(Some(only)),
            (None, []) => Ok(None),
            (None, many) => Err(Error::AmbiguousParent { candidates: many.len() }),
        }
    }

    /// Resolves and binds a single cover declaration.
    pub fn bind_cover(&self, index: usize, cover: &CoverConfig) -> Result<Cover<'_>, Vec<Error>> {
        let path = |field: &str| format!("cover[{index}].{field}");
        let mut errors = vec![];

        let node_id = cover
            .node_id
            .resolve()
            .map_err(|err| errors.push(Error::from(err).at(path("node_id"))))
            .ok();

        let device_type = match &cover.device_type {
            Some(name) => DeviceType::resolve(name)
                .map_err(|err| errors.push(Error::from(err).at(path("device_type"))))
                .ok(),
            None => Some(DeviceType::default()),
        };

        let parent = match self.parent(cover.iohomecontrol_id.as_ref()) {
            Ok(Some(parent)) => Some(parent),
            Ok(None) => {
                let requested = cover.iohomecontrol_id.clone();
                errors.push(Error::MissingParent { requested }.at(path("iohomecontrol_id")));
                None
            }
            Err(err) => {
                errors.push(err.at(path("iohomecontrol_id")));
                None
            }
        };

        let (Some(node_id), Some(device_type), Some(parent)) = (node_id, device_type, parent) else {
            return Err(errors);
        };

        let binding = bind(node_id, device_type, Some(parent))
            .map_err(|err| vec![err.at(path("iohomecontrol_id"))])?;

        Ok(Cover {
            id: cover_id(index, cover),
            name: cover.name.clone(),
            binding,
        })
    }

    /// Binds every cover, failing if any single one of them fails.
    ///
    /// All failures are collected so they can be fixed in one go; no partial
    /// manifest is ever returned.
    pub fn bind_covers<'a>(&'a self, covers: &[CoverConfig]) -> Result<Manifest<'a>> {
        let mut resolved = vec![];
        let mut errors = vec![];

        for (index, cover) in covers.iter().enumerate() {
            match self.bind_cover(index, cover) {
                Ok(cover) => resolved.push(cover),
                Err(errs) => {
                    tracing::debug!(index, errors = errs.len(), "Rejected cover");
                    errors.extend(errs);
                }
            }
        }

        let mut ids = self.controllers.iter().map(|c| &c.id).collect::<HashSet<_>>();
        for cover in &resolved {
            if !ids.insert(&cover.id) {
                errors.push(Error::DuplicateId(cover.id.clone()));
            }
        }

        if !errors.is_empty() {
            return Err(Error::Invalid(errors));
        }

        Ok(Manifest { controllers: &self.controllers, covers: resolved })
    }
}

/// Explicit id, else the name in snake case, else `cover_<index>`
fn cover_id(index: usize, cover: &CoverConfig) -> ComponentId {
    match (&cover.id, &cover.name) {
        (Some(id), _) => id.clone(),
        (None, Some(name)) if !name.to_snake_case().is_empty() => name.to_snake_case().into(),
        (None, _) => format!("cover_{index}").into(),
    }
}

impl Manifest<'_> {
    pub fn dump_config(&self) {
        for controller in self.controllers {
            controller.dump_config();
        }

        for cover in &self.covers {
            match &cover.name {
                Some(name) => tracing::info!("io-homecontrol Cover {} ({name}):", cover.id),
                None => tracing::info!("io-homecontrol Cover {}:", cover.id),
            }
            cover.binding.dump_config();
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeIdLiteral;

    const TWO_CONTROLLERS: &str = r#"
iohomecontrol:
  - id: upstairs
    node_id: 0x000001
    system_key: "000102030405060708090a0b0c0d0e0f"
  - id: downstairs
    node_id: 0x000002
    system_key: "000102030405060708090a0b0c0d0e0f"
    mode: 2w
    frequency: 869.85
"#;

    fn single_controller(covers: &str) -> Config {
        Config::from_yaml(&format!(
            r#"
iohomecontrol:
  - node_id: 0xABCDEF
    system_key: "000102030405060708090a0b0c0d0e0f"
cover:
{covers}"#
        ))
        .unwrap()
    }

    fn messages(err: Error) -> Vec<String> {
        match err {
            Error::Invalid(errors) => errors.iter().map(ToString::to_string).collect(),
            err => panic!("expected Error::Invalid, got {err:?}"),
        }
    }

    #[test]
    fn resolves_covers() {
        let config = single_controller(
            r#"
  - name: Living Room Shutter
    node_id: 0x123456
    device_type: Venetian_Blind
  - node_id: 16777215
"#,
        );

        let registry = Registry::from_config(&config).unwrap();
        let manifest = registry.bind_covers(&config.cover).unwrap();

        let living_room = &manifest.covers[0];
        assert_eq!(living_room.id, "living_room_shutter");
        assert_eq!(living_room.binding.node_id().to_bytes(), [0x12, 0x34, 0x56]);
        assert_eq!(living_room.binding.device_type(), DeviceType::VenetianBlind);
        assert_eq!(living_room.binding.parent().id, "iohomecontrol");

        let unnamed = &manifest.covers[1];
        assert_eq!(unnamed.id, "cover_1");
        assert_eq!(unnamed.binding.node_id().to_bytes(), [0xFF, 0xFF, 0xFF]);
        assert_eq!(unnamed.binding.device_type().code(), 0x00);
    }

    #[test]
    fn manifest_format() {
        let config = single_controller(
            r#"
  - id: kitchen
    name: Kitchen
    node_id: "0x00AB12"
    device_type: awning
"#,
        );

        let registry = Registry::from_config(&config).unwrap();
        let manifest = registry.bind_covers(&config.cover).unwrap();

        assert_eq!(
            serde_json::to_value(&manifest).unwrap()["covers"],
            serde_json::json!([{
                "id": "kitchen",
                "name": "Kitchen",
                "node_id": [0x00, 0xAB, 0x12],
                "device_type": 0x08,
                "parent": "iohomecontrol",
                "traits": { "position": true, "tilt": false, "assumed_state": true },
            }])
        );

        let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(json["controllers"][0]["node_id"], serde_json::json!([0xAB, 0xCD, 0xEF]));
    }

    #[test]
    fn collects_every_failure() {
        let config = single_controller(
            r#"
  - node_id: 0x123456
  - node_id: 16777216
    device_type: unknown_type
  - node_id: -1
  - node_id: 1
    device_type: ""
  - node_id: 2
    iohomecontrol_id: attic
"#,
        );

        let registry = Registry::from_config(&config).unwrap();
        let messages = messages(registry.bind_covers(&config.cover).unwrap_err());

        assert_eq!(messages.len(), 5, "{messages:#?}");
        assert!(messages[0].starts_with("cover[1].node_id: node id 16777216 is out of range"));
        assert!(messages[1].starts_with(
            r#"cover[1].device_type: unknown device type "unknown_type", expected one of: adjustable_slat_shutter, awning,"#
        ));
        assert!(messages[2].starts_with("cover[2].node_id: node id -1 is out of range"));
        assert!(messages[3].starts_with(r#"cover[3].device_type: unknown device type """#));
        assert_eq!(
            messages[4],
            "cover[4].iohomecontrol_id: no io-homecontrol controller with id attic to attach to"
        );
    }

    #[test]
    fn oversized_node_ids_are_out_of_range() {
        let config = single_controller(
            r#"
  - node_id: 18446744073709551616
  - node_id: "99999999999999999999999999999999999999999"
"#,
        );

        let registry = Registry::from_config(&config).unwrap();
        let messages = messages(registry.bind_covers(&config.cover).unwrap_err());

        assert_eq!(
            messages,
            [
                "cover[0].node_id: node id 18446744073709551616 is out of range (expected 0..=16777215)",
                "cover[1].node_id: node id 99999999999999999999999999999999999999999 is out of range (expected 0..=16777215)",
            ]
        );
    }

    #[test]
    fn unknown_capability_lists_all_names() {
        let config = single_controller("  - node_id: 1\n    device_type: unknown_type\n");
        let registry = Registry::from_config(&config).unwrap();

        let errors = registry.bind_cover(0, &config.cover[0]).unwrap_err();
        let Error::Resolve(iohome_common::Error::UnknownCapability { valid, .. }) = errors[0].root()
        else {
            panic!("expected an unknown capability error, got {:?}", errors[0]);
        };
        assert_eq!(valid.len(), 13);
        assert!(valid.is_sorted());
    }

    #[test]
    fn missing_parent() {
        let config = Config::from_yaml("cover:\n  - node_id: 0x123456\n").unwrap();
        let registry = Registry::from_config(&config).unwrap();

        let errors = registry.bind_cover(0, &config.cover[0]).unwrap_err();
        assert!(matches!(errors[0].root(), Error::MissingParent { requested: None }));
    }

    #[test]
    fn picks_parent_by_id() {
        let config = Config::from_yaml(&format!(
            r#"{TWO_CONTROLLERS}
cover:
  - node_id: 1
    iohomecontrol_id: downstairs
  - node_id: 2
"#
        ))
        .unwrap();

        let registry = Registry::from_config(&config).unwrap();

        let cover = registry.bind_cover(0, &config.cover[0]).unwrap();
        assert_eq!(cover.binding.parent().id, "downstairs");
        assert!(!cover.binding.traits().assumed_state);

        let errors = registry.bind_cover(1, &config.cover[1]).unwrap_err();
        assert!(matches!(errors[0].root(), Error::AmbiguousParent { candidates: 2 }));
    }

    #[test]
    fn duplicate_ids() {
        let config = single_controller(
            r#"
  - id: iohomecontrol
    node_id: 1
  - name: Hall
    node_id: 2
  - id: hall
    node_id: 3
"#,
        );

        let registry = Registry::from_config(&config).unwrap();
        let messages = messages(registry.bind_covers(&config.cover).unwrap_err());

        assert_eq!(messages, [
            "id iohomecontrol is declared more than once",
            "id hall is declared more than once",
        ]);
    }

    #[test]
    fn invalid_controllers() {
        let config = Config::from_yaml(&format!(
            r#"{TWO_CONTROLLERS}
  - id: upstairs
    node_id: 0x1000000
    system_key: "00"
"#
        ))
        .unwrap();

        let messages = messages(Registry::from_config(&config).err().unwrap());
        assert_eq!(messages.len(), 2, "{messages:#?}");
        assert!(messages[0].starts_with("iohomecontrol[2].node_id"));
        assert!(messages[1].starts_with("iohomecontrol[2].system_key"));
    }

    #[test]
    fn duplicate_controllers() {
        let config = Config::from_yaml(&TWO_CONTROLLERS.replace("downstairs", "upstairs")).unwrap();

        let messages = messages(Registry::from_config(&config).err().unwrap());
        assert_eq!(messages, ["id upstairs is declared more than once"]);
    }

    #[test]
    fn generated_ids() {
        let cover = |id: Option<&str>, name: Option<&str>| CoverConfig {
            id: id.map(Into::into),
            name: name.map(Into::into),
            iohomecontrol_id: None,
            node_id: NodeIdLiteral::Int(1),
            device_type: None,
        };

        assert_eq!(cover_id(0, &cover(Some("x"), Some("Y"))), "x");
        assert_eq!(cover_id(0, &cover(None, Some("Garage Door"))), "garage_door");
        assert_eq!(cover_id(4, &cover(None, Some("!!"))), "cover_4");
        assert_eq!(cover_id(5, &cover(None, None)), "cover_5");
    }
}
