use std::fmt::{self, Debug, Display};

use serde::{Serialize, Serializer};

/// An ASCII password.
/// A `Password` can only be built from a [`RainbowTableCtx`](crate::RainbowTableCtx),
/// which checks that it has the right length and only uses characters of the charset.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Password(Vec<u8>);

impl Password {
    /// Wraps bytes that are already known to belong to the search space.
    #[inline]
    pub(crate) fn from_raw(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Password {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}
