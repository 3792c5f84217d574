#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::vec::Vec;

use compact_str::CompactString;

pub mod device_type;
pub mod node;
pub mod radio;

mod string;
pub use device_type::{DEVICE_TYPES, DeviceType, resolve_capability};
pub use node::NodeId;
pub use string::*;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("node id {value} is out of range (expected 0..={max})", max = NodeId::MAX)]
    AddressRange { value: i128 },
    /// A well-formed literal too large to even hold as a number
    #[error("node id {literal} is out of range (expected 0..={max})", max = NodeId::MAX)]
    AddressOverflow { literal: CompactString },
    #[error("invalid node id literal {0:?}")]
    InvalidLiteral(CompactString),
    #[error("unknown device type {name:?}, expected one of: {}", .valid.join(", "))]
    UnknownCapability {
        name: CompactString,
        /// Sorted
        valid: Vec<&'static str>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_range_message() {
        assert_eq!(
            Error::AddressRange { value: 16777216 }.to_string(),
            "node id 16777216 is out of range (expected 0..=16777215)"
        );
    }

    #[test]
    fn address_overflow_message() {
        assert_eq!(
            Error::AddressOverflow { literal: "0x1000000000000000000000000000000000".into() }
                .to_string(),
            "node id 0x1000000000000000000000000000000000 is out of range (expected 0..=16777215)"
        );
    }

    #[test]
    fn unknown_capability_message() {
        let err = Error::UnknownCapability {
            name: "blind".into(),
            valid: vec!["awning", "curtain"],
        };

        assert_eq!(
            err.to_string(),
            r#"unknown device type "blind", expected one of: awning, curtain"#
        );
    }
}
