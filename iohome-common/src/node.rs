//! 24-bit io-homecontrol node identifiers
//!
//! Node ids travel as three big-endian bytes in every frame header. In
//! configuration they're written as plain integers, either decimal or hex:
//!
//! ```plain
//! node_id: 0x123456    => [0x12, 0x34, 0x56]
//! node_id: "1193046"   => [0x12, 0x34, 0x56]
//! ```

use core::{
    fmt::{self, Display},
    num::IntErrorKind,
    str::FromStr,
};

use bytes::{Buf, BufMut};
use compact_str::ToCompactString as _;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const MAX: u32 = 0xFF_FFFF;
    pub const SIZE: usize = 3;
    pub const BROADCAST: Self = NodeId(0);

    /// Validates a raw integer, rejecting anything that doesn't fit in 24 bits.
    pub fn new(raw: impl Into<i128>) -> Result<Self> {
        let value = raw.into();

        match u32::try_from(value) {
            Ok(id) if id <= Self::MAX => Ok(NodeId(id)),
            _ => Err(Error::AddressRange { value }),
        }
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        NodeId((bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32)
    }

    pub const fn to_bytes(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub fn encode(self, mut buf: impl BufMut) {
        buf.put_slice(&self.to_bytes());
    }

    /// Reads a node id from the front of `buf`, or `None` if it is too short.
    pub fn decode(mut buf: impl Buf) -> Option<Self> {
        if buf.remaining() < Self::SIZE {
            return None;
        }

        Some(NodeId(buf.get_uint(Self::SIZE) as u32))
    }

    /// Formats the id the way frame dumps show it, eg. `12 34 56`
    pub fn spaced(self) -> impl Display {
        let [a, b, c] = self.to_bytes();
        SpacedBytes(a, b, c)
    }
}

struct SpacedBytes(u8, u8, u8);

impl Display for SpacedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X} {:02X}", self.0, self.1, self.2)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (radix, digits) = match digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
        {
            Some(hex) => (16, hex),
            None => (10, digits),
        };

        // from_str_radix would happily take another sign here
        if !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(Error::InvalidLiteral(s.to_compact_string()));
        }

        let value = match i128::from_str_radix(digits, radix) {
            Ok(value) => value,
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    return Err(Error::AddressOverflow { literal: trimmed.to_compact_string() });
                }
                _ => return Err(Error::InvalidLiteral(s.to_compact_string())),
            },
        };

        NodeId::new(if negative { -value } else { value })
    }
}

impl From<NodeId> for u32 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}
