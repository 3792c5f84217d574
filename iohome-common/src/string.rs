use core::{fmt::Display, ops::Deref};

use compact_str::{CompactString, ToCompactString};
use serde::{Deserialize, Serialize};

/// Identifier of a declared component (a controller or a cover)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(CompactString);

impl ComponentId {
    pub const fn const_new(s: &'static str) -> Self {
        Self(CompactString::const_new(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: AsRef<str>> From<T> for ComponentId {
    fn from(value: T) -> Self {
        ComponentId(value.as_ref().to_compact_string())
    }
}

impl Deref for ComponentId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl<T: AsRef<str> + ?Sized> PartialEq<T> for ComponentId {
    fn eq(&self, other: &T) -> bool {
        self.0.as_str() == other.as_ref()
    }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}
