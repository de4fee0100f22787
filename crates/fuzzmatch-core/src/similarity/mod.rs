//! Similarity algorithms
//!
//! Every [`Algorithm`] maps a pair of canonical names to a [`SimilarityScore`]
//! in `[0, 1]` and is symmetric, with `score(s, s) == 1.0` for any `s`,
//! including the empty name. One empty side against a non-empty side scores
//! `0.0` for every algorithm.
//!
//! # Example
//!
//! ```rust
//! use fuzzmatch_core::normalize::Normalizer;
//! use fuzzmatch_core::similarity::Algorithm;
//!
//! let n = Normalizer::default();
//! let a = n.normalize_str("Fuzzy Wuzzy was a bear");
//! let b = n.normalize_str("wuzzy fuzzy was a bear");
//! assert_eq!(Algorithm::TokenSortRatio.score(&a, &b).value(), 1.0);
//! ```

mod edit;
mod token;

pub use edit::{damerau_levenshtein_similarity, jaro_winkler_similarity, levenshtein_similarity};
pub use token::{partial_ratio, ratio, token_set_ratio, token_sort_ratio, weighted_ratio};

use crate::error::{check_range, MatchError, Result};
use crate::name::CanonicalName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A score in `[0, 1]`. Never NaN.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SimilarityScore(f64);

impl SimilarityScore {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// `None` unless `value` is in `[0, 1]`
    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    /// Clamp algorithm output into range; NaN becomes zero.
    pub(crate) fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Scores keyed by algorithm, in stable algorithm order
pub type ScoreSet = BTreeMap<Algorithm, SimilarityScore>;

/// Similarity algorithm identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Levenshtein,
    DamerauLevenshtein,
    JaroWinkler,
    TokenSetRatio,
    TokenSortRatio,
    PartialRatio,
    WeightedRatio,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Levenshtein,
        Algorithm::DamerauLevenshtein,
        Algorithm::JaroWinkler,
        Algorithm::TokenSetRatio,
        Algorithm::TokenSortRatio,
        Algorithm::PartialRatio,
        Algorithm::WeightedRatio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Levenshtein => "levenshtein",
            Self::DamerauLevenshtein => "damerau_levenshtein",
            Self::JaroWinkler => "jaro_winkler",
            Self::TokenSetRatio => "token_set_ratio",
            Self::TokenSortRatio => "token_sort_ratio",
            Self::PartialRatio => "partial_ratio",
            Self::WeightedRatio => "weighted_ratio",
        }
    }

    /// Score with default parameters
    pub fn score(self, a: &CanonicalName, b: &CanonicalName) -> SimilarityScore {
        self.score_with(a, b, &SimilarityParams::default())
    }

    pub fn score_with(
        self,
        a: &CanonicalName,
        b: &CanonicalName,
        params: &SimilarityParams,
    ) -> SimilarityScore {
        SimilarityScore::clamped(self.raw_score(a.as_str(), b.as_str(), params))
    }

    fn raw_score(self, a: &str, b: &str, params: &SimilarityParams) -> f64 {
        match self {
            Self::Levenshtein => levenshtein_similarity(a, b),
            Self::DamerauLevenshtein => damerau_levenshtein_similarity(a, b),
            Self::JaroWinkler => jaro_winkler_similarity(a, b, params.jaro_winkler_prefix_scale),
            Self::TokenSetRatio => token_set_ratio(a, b),
            Self::TokenSortRatio => token_sort_ratio(a, b),
            Self::PartialRatio => partial_ratio(a, b),
            Self::WeightedRatio => weighted_ratio(a, b, &params.weighted_ratio),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| MatchError::UnknownAlgorithm(s.to_string()))
    }
}

/// Weights for [`Algorithm::WeightedRatio`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedRatioWeights {
    /// Scale applied to token-sort / token-set candidates
    pub unbase_scale: f64,
    /// Scale applied to partial candidates under moderate length disparity
    pub partial_scale: f64,
    /// Scale applied to partial candidates once `long_length_ratio` is reached
    pub long_partial_scale: f64,
    /// Length ratio from which partial alignment is used
    pub partial_length_ratio: f64,
    pub long_length_ratio: f64,
}

impl Default for WeightedRatioWeights {
    fn default() -> Self {
        Self {
            unbase_scale: 0.95,
            partial_scale: 0.9,
            long_partial_scale: 0.6,
            partial_length_ratio: 1.5,
            long_length_ratio: 8.0,
        }
    }
}

impl WeightedRatioWeights {
    pub fn validate(&self) -> Result<()> {
        check_range("weighted_ratio.unbase_scale", self.unbase_scale, 0.0, 1.0)?;
        check_range("weighted_ratio.partial_scale", self.partial_scale, 0.0, 1.0)?;
        check_range(
            "weighted_ratio.long_partial_scale",
            self.long_partial_scale,
            0.0,
            1.0,
        )?;
        check_range(
            "weighted_ratio.partial_length_ratio",
            self.partial_length_ratio,
            1.0,
            f64::MAX,
        )?;
        check_range(
            "weighted_ratio.long_length_ratio",
            self.long_length_ratio,
            self.partial_length_ratio,
            f64::MAX,
        )
    }
}

/// Tunable parameters shared by all algorithms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityParams {
    /// Winkler prefix scale, `[0, 0.25]`
    pub jaro_winkler_prefix_scale: f64,
    pub weighted_ratio: WeightedRatioWeights,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            jaro_winkler_prefix_scale: 0.1,
            weighted_ratio: WeightedRatioWeights::default(),
        }
    }
}

impl SimilarityParams {
    pub fn validate(&self) -> Result<()> {
        check_range(
            "jaro_winkler_prefix_scale",
            self.jaro_winkler_prefix_scale,
            0.0,
            0.25,
        )?;
        self.weighted_ratio.validate()
    }
}
