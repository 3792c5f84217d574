use iohome_common::ComponentId;

pub mod binding;
pub mod config;
pub mod controller;
pub mod log;
pub mod registry;

pub use iohome_common as common;

pub use self::{
    binding::{CoverTraits, DeviceBinding, bind},
    config::Config,
    controller::{Controller, SystemKey},
    registry::{Cover, Manifest, Registry},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] iohome_common::Error),
    #[error("{}", missing_parent(.requested))]
    MissingParent { requested: Option<ComponentId> },
    #[error("{candidates} io-homecontrol controllers are declared, pick one with iohomecontrol_id")]
    AmbiguousParent { candidates: usize },
    #[error("{mhz} MHz is not an io-homecontrol channel (868.25, 868.95 or 869.85)")]
    UnknownChannel { mhz: f32 },
    #[error("1W mode only transmits on 868.95 MHz, got {mhz} MHz")]
    OneWayChannel { mhz: f32 },
    #[error("system key must be 16 bytes of hex: {0}")]
    SystemKey(#[from] hex::FromHexError),
    #[error("id {0} is declared more than once")]
    DuplicateId(ComponentId),
    #[error("{path}: {source}")]
    Field {
        path: String,
        #[source]
        source: Box<Error>,
    },
    #[error("configuration has {} error(s):{}", .0.len(), list(.0))]
    Invalid(Vec<Error>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn at(self, path: impl Into<String>) -> Self {
        Error::Field { path: path.into(), source: Box::new(self) }
    }

    /// The innermost error, without field locations
    pub fn root(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root(),
            err => err,
        }
    }
}

fn missing_parent(requested: &Option<ComponentId>) -> String {
    match requested {
        Some(id) => format!("no io-homecontrol controller with id {id} to attach to"),
        None => "no io-homecontrol controller declared to attach to".to_owned(),
    }
}

fn list(errors: &[Error]) -> String {
    errors.iter().map(|err| format!("\n  {err}")).collect()
}
