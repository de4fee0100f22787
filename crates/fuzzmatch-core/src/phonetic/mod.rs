//! Phonetic encoders for coarse candidate filtering
//!
//! Codes are index keys only. Two names sharing a code are worth scoring;
//! sharing a code says nothing about whether they match.

mod double_metaphone;
mod metaphone;
mod soundex;

pub use double_metaphone::{double_metaphone, DoubleMetaphone};
pub use metaphone::{metaphone, Metaphone, MAX_CODE_LEN as METAPHONE_MAX_LEN};
pub use soundex::{soundex, Soundex};

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Short code over a fixed alphabet. Empty when the input has no encodable letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneticCode(String);

impl PhoneticCode {
    pub(crate) fn new(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PhoneticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic, total token encoder
pub trait PhoneticEncoder: Send + Sync {
    fn name(&self) -> &'static str;

    fn encode(&self, token: &str) -> PhoneticCode;
}

/// Encoder selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneticAlgorithm {
    #[default]
    Soundex,
    Metaphone,
    DoubleMetaphone,
}

impl PhoneticAlgorithm {
    pub const ALL: [PhoneticAlgorithm; 3] = [
        PhoneticAlgorithm::Soundex,
        PhoneticAlgorithm::Metaphone,
        PhoneticAlgorithm::DoubleMetaphone,
    ];

    fn encoder(self) -> &'static dyn PhoneticEncoder {
        match self {
            Self::Soundex => &Soundex,
            Self::Metaphone => &Metaphone,
            Self::DoubleMetaphone => &DoubleMetaphone,
        }
    }
}

impl PhoneticEncoder for PhoneticAlgorithm {
    fn name(&self) -> &'static str {
        self.encoder().name()
    }

    fn encode(&self, token: &str) -> PhoneticCode {
        self.encoder().encode(token)
    }
}

impl fmt::Display for PhoneticAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PhoneticAlgorithm {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| MatchError::UnknownAlgorithm(s.to_string()))
    }
}
