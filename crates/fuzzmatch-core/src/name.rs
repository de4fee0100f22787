//! Name value types
//!
//! `RawName` is caller input exactly as given. `CanonicalName` only comes out of
//! a [`Normalizer`](crate::normalize::Normalizer); two raw names are equivalent
//! iff their canonical forms are equal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unnormalized input string. Identity is the exact byte content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawName(String);

impl RawName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for RawName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RawName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for RawName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of the normalizer. Not constructible outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in chars, the unit every algorithm works in.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
