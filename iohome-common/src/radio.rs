//! Radio channels and link modes

use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// 868.25 MHz, 2W only
    One,
    /// 868.95 MHz, used by both 1W and 2W
    Two,
    /// 869.85 MHz, 2W only
    Three,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::One, Channel::Two, Channel::Three];

    pub const fn mhz(self) -> f32 {
        match self {
            Channel::One => 868.25,
            Channel::Two => 868.95,
            Channel::Three => 869.85,
        }
    }

    /// Matches a configured frequency to a channel, within 5 kHz.
    pub fn from_mhz(mhz: f32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| (-0.005..0.005).contains(&(channel.mhz() - mhz)))
    }

    pub fn supports(self, mode: Mode) -> bool {
        match mode {
            Mode::OneWay => self == Channel::Two,
            Mode::TwoWay => true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Commands only, the actuator never answers
    #[default]
    #[serde(rename = "1w", alias = "1W")]
    OneWay,
    #[serde(rename = "2w", alias = "2W")]
    TwoWay,
}

impl Mode {
    /// Whether actuators report their state back
    pub fn has_feedback(self) -> bool {
        self == Mode::TwoWay
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::OneWay => f.write_str("1W"),
            Mode::TwoWay => f.write_str("2W"),
        }
    }
}
