//! Cover actuator subtypes
//!
//! Each subtype has a fixed code understood by the actuators. Names are
//! matched ignoring ASCII case, so `Venetian_Blind` and `venetian_blind`
//! resolve to the same code.
//!
//! ```plain
//! device_type: venetian_blind   => 0x04
//! device_type: (absent)         => 0x00 (roller_shutter)
//! ```

use alloc::vec::Vec;
use core::{
    fmt::{self, Display},
    str::FromStr,
};

use compact_str::ToCompactString as _;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DeviceType {
    #[default]
    RollerShutter = 0x00,
    AdjustableSlatShutter = 0x01,
    Screen = 0x02,
    WindowOpener = 0x03,
    VenetianBlind = 0x04,
    ExteriorBlind = 0x05,
    DualShutter = 0x06,
    GarageDoor = 0x07,
    Awning = 0x08,
    Curtain = 0x09,
    Pergola = 0x0A,
    HorizontalAwning = 0x0B,
    ExteriorScreen = 0x0C,
}

/// Name to code table for every cover subtype, in code order.
pub const DEVICE_TYPES: [(&str, u8); 13] = {
    let mut table = [("", 0); 13];
    let mut i = 0;
    while i < DeviceType::ALL.len() {
        let ty = DeviceType::ALL[i];
        table[i] = (ty.name(), ty.code());
        i += 1;
    }
    table
};

impl DeviceType {
    pub const ALL: [DeviceType; 13] = [
        DeviceType::RollerShutter,
        DeviceType::AdjustableSlatShutter,
        DeviceType::Screen,
        DeviceType::WindowOpener,
        DeviceType::VenetianBlind,
        DeviceType::ExteriorBlind,
        DeviceType::DualShutter,
        DeviceType::GarageDoor,
        DeviceType::Awning,
        DeviceType::Curtain,
        DeviceType::Pergola,
        DeviceType::HorizontalAwning,
        DeviceType::ExteriorScreen,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            DeviceType::RollerShutter => "roller_shutter",
            DeviceType::AdjustableSlatShutter => "adjustable_slat_shutter",
            DeviceType::Screen => "screen",
            DeviceType::WindowOpener => "window_opener",
            DeviceType::VenetianBlind => "venetian_blind",
            DeviceType::ExteriorBlind => "exterior_blind",
            DeviceType::DualShutter => "dual_shutter",
            DeviceType::GarageDoor => "garage_door",
            DeviceType::Awning => "awning",
            DeviceType::Curtain => "curtain",
            DeviceType::Pergola => "pergola",
            DeviceType::HorizontalAwning => "horizontal_awning",
            DeviceType::ExteriorScreen => "exterior_screen",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Resolves a configured name through [`DEVICE_TYPES`].
    pub fn resolve(name: &str) -> Result<Self> {
        let code = resolve_capability(name, &DEVICE_TYPES)?;

        // the table is built from ALL, so every code it holds maps back
        Ok(Self::ALL[code as usize])
    }
}

/// Looks `name` up in `table`, comparing ASCII-lowercased forms of both.
///
/// On a miss the error lists every name in the table, sorted.
pub fn resolve_capability(name: &str, table: &[(&'static str, u8)]) -> Result<u8> {
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
        .ok_or_else(|| {
            let mut valid = table.iter().map(|&(key, _)| key).collect::<Vec<_>>();
            valid.sort_unstable();

            Error::UnknownCapability { name: name.to_compact_string(), valid }
        })
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}
