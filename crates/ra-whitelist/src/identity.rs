//! Opaque identity values.

use std::fmt;

use subtle::ConstantTimeEq;

/// Expected identity of a component, typically a measurement hash.
///
/// Compared in constant time so a probing peer learns nothing from timing.
#[derive(Clone)]
pub struct IdentityValue(Vec<u8>);

impl IdentityValue {
    /// Wrap raw identity bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte-for-byte equality in constant time.
    pub fn matches(&self, presented: &[u8]) -> bool {
        self.0.as_slice().ct_eq(presented).into()
    }
}

impl PartialEq for IdentityValue {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for IdentityValue {}

impl PartialEq<[u8]> for IdentityValue {
    fn eq(&self, other: &[u8]) -> bool {
        self.matches(other)
    }
}

impl From<Vec<u8>> for IdentityValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for IdentityValue {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for IdentityValue {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl fmt::Debug for IdentityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityValue({})", hex::encode(&self.0))
    }
}
