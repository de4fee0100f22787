//! Match scorer - runs a set of similarity algorithms over one pair

use std::collections::BTreeSet;

use crate::error::{MatchError, Result};
use crate::name::CanonicalName;
use crate::similarity::{Algorithm, ScoreSet, SimilarityParams, SimilarityScore};

/// Default cap on canonical name length, in chars
pub const DEFAULT_MAX_INPUT_CHARS: usize = 10_000;

/// Scores canonical name pairs with the registered algorithms.
///
/// Requests for an algorithm outside the registered set fail with
/// [`MatchError::UnknownAlgorithm`]; nothing is substituted.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    registered: BTreeSet<Algorithm>,
    params: SimilarityParams,
    max_input_chars: usize,
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self {
            registered: Algorithm::ALL.into_iter().collect(),
            params: SimilarityParams::default(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

impl MatchScorer {
    pub fn new(
        algorithms: impl IntoIterator<Item = Algorithm>,
        params: SimilarityParams,
        max_input_chars: usize,
    ) -> Result<Self> {
        params.validate()?;
        if max_input_chars == 0 {
            return Err(MatchError::config("max_input_chars must be positive"));
        }
        let registered: BTreeSet<Algorithm> = algorithms.into_iter().collect();
        if registered.is_empty() {
            return Err(MatchError::config("at least one algorithm must be enabled"));
        }
        Ok(Self {
            registered,
            params,
            max_input_chars,
        })
    }

    pub fn algorithms(&self) -> impl Iterator<Item = Algorithm> + '_ {
        self.registered.iter().copied()
    }

    pub fn is_registered(&self, algorithm: Algorithm) -> bool {
        self.registered.contains(&algorithm)
    }

    pub fn params(&self) -> &SimilarityParams {
        &self.params
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    /// Fail with `InputTooLarge` if `name` exceeds the cap
    pub fn check_input(&self, name: &CanonicalName) -> Result<()> {
        let len = name.char_len();
        if len > self.max_input_chars {
            return Err(MatchError::InputTooLarge {
                len,
                limit: self.max_input_chars,
            });
        }
        Ok(())
    }

    pub fn ensure_registered(&self, algorithm: Algorithm) -> Result<()> {
        if self.is_registered(algorithm) {
            Ok(())
        } else {
            Err(MatchError::UnknownAlgorithm(algorithm.name().to_string()))
        }
    }

    /// Score one pair with one algorithm
    pub fn score(
        &self,
        algorithm: Algorithm,
        a: &CanonicalName,
        b: &CanonicalName,
    ) -> Result<SimilarityScore> {
        self.ensure_registered(algorithm)?;
        self.check_input(a)?;
        self.check_input(b)?;
        Ok(algorithm.score_with(a, b, &self.params))
    }

    /// Score one pair with every requested algorithm.
    ///
    /// All ids and input lengths are checked before any algorithm runs.
    pub fn score_all(
        &self,
        a: &CanonicalName,
        b: &CanonicalName,
        algorithms: &[Algorithm],
    ) -> Result<ScoreSet> {
        for &algorithm in algorithms {
            self.ensure_registered(algorithm)?;
        }
        self.check_input(a)?;
        self.check_input(b)?;

        Ok(algorithms
            .iter()
            .map(|&alg| (alg, alg.score_with(a, b, &self.params)))
            .collect())
    }

    /// [`score_all`](Self::score_all) with algorithms given by name
    pub fn score_named(
        &self,
        a: &CanonicalName,
        b: &CanonicalName,
        names: &[&str],
    ) -> Result<ScoreSet> {
        let algorithms = names
            .iter()
            .map(|name| name.parse::<Algorithm>())
            .collect::<Result<Vec<_>>>()?;
        self.score_all(a, b, &algorithms)
    }

    /// Score with every registered algorithm
    pub fn score_registered(&self, a: &CanonicalName, b: &CanonicalName) -> Result<ScoreSet> {
        let algorithms: Vec<Algorithm> = self.algorithms().collect();
        self.score_all(a, b, &algorithms)
    }
}
