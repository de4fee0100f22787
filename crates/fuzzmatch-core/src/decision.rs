//! Accept/reject decisions over score sets
//!
//! The default policy accepts iff the primary algorithm's score reaches the
//! threshold. Quorum modes generalize this to agreement across every score
//! in the set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{check_range, MatchError, Result};
use crate::phonetic::{PhoneticAlgorithm, PhoneticCode};
use crate::similarity::{Algorithm, ScoreSet, SimilarityScore};

/// How many scores must pass the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumMode {
    /// Only the primary algorithm's score counts
    #[default]
    Primary,
    /// More than half of the scores pass; an exact half is a tie
    Majority,
    /// Every score passes
    All,
    /// At least `n` scores pass
    AtLeast(usize),
    /// The weighted mean of the scores passes
    WeightedMean,
}

/// Outcome when a score equals the threshold, or a majority vote splits evenly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    Accept,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub primary_algorithm: Algorithm,
    pub threshold: f64,
    pub quorum: QuorumMode,
    pub tie_break: TieBreak,
    /// Per-algorithm weights for `weighted_mean`; unlisted algorithms weigh 1.0
    pub weights: BTreeMap<Algorithm, f64>,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            primary_algorithm: Algorithm::WeightedRatio,
            threshold: 0.85,
            quorum: QuorumMode::Primary,
            tie_break: TieBreak::Accept,
            weights: BTreeMap::new(),
        }
    }
}

impl DecisionConfig {
    /// Primary-only policy
    pub fn primary(algorithm: Algorithm, threshold: f64) -> Self {
        Self {
            primary_algorithm: algorithm,
            threshold,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_range("threshold", self.threshold, 0.0, 1.0)?;
        for (algorithm, weight) in &self.weights {
            check_range(&format!("weight for {algorithm}"), *weight, 0.0, f64::MAX)?;
        }
        if self.quorum == QuorumMode::AtLeast(0) {
            return Err(MatchError::config("at_least quorum must require at least 1 score"));
        }
        Ok(())
    }

    fn weight(&self, algorithm: Algorithm) -> f64 {
        self.weights.get(&algorithm).copied().unwrap_or(1.0)
    }
}

/// One line of a decision explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchReason {
    /// `algorithm` cleared the threshold
    Passed {
        algorithm: Algorithm,
        score: SimilarityScore,
        threshold: f64,
    },
    /// How the quorum rule counted the scores
    Quorum {
        mode: QuorumMode,
        passed: usize,
        total: usize,
        /// Weighted mean under `weighted_mean`, primary score otherwise
        score: SimilarityScore,
        accepted: bool,
    },
    /// Both inputs share a non-empty code. Never part of the decision.
    Phonetic {
        encoder: PhoneticAlgorithm,
        code: PhoneticCode,
    },
}

/// Turns a score set into an accept/reject decision
pub trait DecisionStrategy: Send + Sync {
    fn decide(&self, scores: &ScoreSet) -> bool;

    /// Score used to rank candidates decided by this strategy
    fn rank_score(&self, scores: &ScoreSet) -> SimilarityScore;

    /// Why `decide` returns what it does for `scores`
    fn reasons(&self, scores: &ScoreSet) -> Vec<MatchReason>;
}

/// Threshold policy with configurable quorum. Validated at construction.
#[derive(Debug, Clone, Default)]
pub struct ThresholdDecision {
    config: DecisionConfig,
}

impl ThresholdDecision {
    pub fn new(config: DecisionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    fn passes(&self, score: SimilarityScore) -> bool {
        let score = score.value();
        if score == self.config.threshold {
            self.config.tie_break == TieBreak::Accept
        } else {
            score > self.config.threshold
        }
    }

    fn weighted_mean(&self, scores: &ScoreSet) -> SimilarityScore {
        let (sum, total) = scores.iter().fold((0.0, 0.0), |(sum, total), (alg, score)| {
            let w = self.config.weight(*alg);
            (sum + w * score.value(), total + w)
        });
        if total > 0.0 {
            SimilarityScore::clamped(sum / total)
        } else {
            SimilarityScore::ZERO
        }
    }
}

impl DecisionStrategy for ThresholdDecision {
    fn decide(&self, scores: &ScoreSet) -> bool {
        let passing = || scores.values().filter(|s| self.passes(**s)).count();
        match self.config.quorum {
            QuorumMode::Primary => scores
                .get(&self.config.primary_algorithm)
                .is_some_and(|s| self.passes(*s)),
            QuorumMode::Majority => {
                let (pass, total) = (passing(), scores.len());
                if total == 0 {
                    false
                } else if 2 * pass == total {
                    self.config.tie_break == TieBreak::Accept
                } else {
                    2 * pass > total
                }
            }
            QuorumMode::All => !scores.is_empty() && passing() == scores.len(),
            QuorumMode::AtLeast(n) => passing() >= n,
            QuorumMode::WeightedMean => !scores.is_empty() && self.passes(self.weighted_mean(scores)),
        }
    }

    fn rank_score(&self, scores: &ScoreSet) -> SimilarityScore {
        match self.config.quorum {
            QuorumMode::WeightedMean => self.weighted_mean(scores),
            _ => scores
                .get(&self.config.primary_algorithm)
                .copied()
                .unwrap_or(SimilarityScore::ZERO),
        }
    }

    fn reasons(&self, scores: &ScoreSet) -> Vec<MatchReason> {
        let mut reasons: Vec<MatchReason> = scores
            .iter()
            .filter(|(_, score)| self.passes(**score))
            .map(|(algorithm, score)| MatchReason::Passed {
                algorithm: *algorithm,
                score: *score,
                threshold: self.config.threshold,
            })
            .collect();
        reasons.push(MatchReason::Quorum {
            mode: self.config.quorum,
            passed: reasons.len(),
            total: scores.len(),
            score: self.rank_score(scores),
            accepted: self.decide(scores),
        });
        reasons
    }
}

/// Validate `config` and decide `scores` in one call
pub fn decide(scores: &ScoreSet, config: &DecisionConfig) -> Result<bool> {
    Ok(ThresholdDecision::new(config.clone())?.decide(scores))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: f64) -> SimilarityScore {
        SimilarityScore::new(v).unwrap()
    }

    fn set(entries: &[(Algorithm, f64)]) -> ScoreSet {
        entries.iter().map(|(a, v)| (*a, s(*v))).collect()
    }

    #[test]
    fn test_primary_threshold() {
        let d = ThresholdDecision::new(DecisionConfig::primary(Algorithm::Levenshtein, 0.8)).unwrap();
        assert!(d.decide(&set(&[(Algorithm::Levenshtein, 0.81)])));
        assert!(!d.decide(&set(&[(Algorithm::Levenshtein, 0.79)])));
        // Other algorithms do not count
        assert!(!d.decide(&set(&[(Algorithm::JaroWinkler, 1.0)])));
    }

    #[test]
    fn test_tie_break_at_threshold() {
        let scores = set(&[(Algorithm::Levenshtein, 0.8)]);
        let accept = DecisionConfig::primary(Algorithm::Levenshtein, 0.8);
        let reject = DecisionConfig {
            tie_break: TieBreak::Reject,
            ..accept.clone()
        };
        assert!(decide(&scores, &accept).unwrap());
        assert!(!decide(&scores, &reject).unwrap());
    }

    #[test]
    fn test_invalid_threshold_fails_at_construction() {
        for threshold in [-0.1, 1.5, f64::NAN] {
            let err = ThresholdDecision::new(DecisionConfig::primary(Algorithm::Levenshtein, threshold))
                .unwrap_err();
            assert!(matches!(err, MatchError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_invalid_weight_and_quorum() {
        let mut config = DecisionConfig::default();
        config.weights.insert(Algorithm::JaroWinkler, -1.0);
        assert!(config.validate().is_err());

        let config = DecisionConfig {
            quorum: QuorumMode::AtLeast(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_majority() {
        let config = DecisionConfig {
            quorum: QuorumMode::Majority,
            threshold: 0.7,
            ..Default::default()
        };
        let d = ThresholdDecision::new(config.clone()).unwrap();
        assert!(d.decide(&set(&[
            (Algorithm::Levenshtein, 0.9),
            (Algorithm::JaroWinkler, 0.8),
            (Algorithm::TokenSetRatio, 0.1),
        ])));
        assert!(!d.decide(&set(&[
            (Algorithm::Levenshtein, 0.9),
            (Algorithm::JaroWinkler, 0.2),
            (Algorithm::TokenSetRatio, 0.1),
        ])));

        // Even split follows the tie break
        let split = set(&[(Algorithm::Levenshtein, 0.9), (Algorithm::JaroWinkler, 0.2)]);
        assert!(d.decide(&split));
        let strict = ThresholdDecision::new(DecisionConfig {
            tie_break: TieBreak::Reject,
            ..config
        })
        .unwrap();
        assert!(!strict.decide(&split));
        assert!(!strict.decide(&ScoreSet::new()));
    }

    #[test]
    fn test_all_and_at_least() {
        let scores = set(&[
            (Algorithm::Levenshtein, 0.9),
            (Algorithm::JaroWinkler, 0.95),
            (Algorithm::TokenSortRatio, 0.5),
        ]);
        let all = DecisionConfig {
            quorum: QuorumMode::All,
            threshold: 0.8,
            ..Default::default()
        };
        assert!(!decide(&scores, &all).unwrap());

        let two = DecisionConfig {
            quorum: QuorumMode::AtLeast(2),
            ..all
        };
        assert!(decide(&scores, &two).unwrap());
    }

    #[test]
    fn test_weighted_mean() {
        let mut config = DecisionConfig {
            quorum: QuorumMode::WeightedMean,
            threshold: 0.75,
            ..Default::default()
        };
        config.weights.insert(Algorithm::JaroWinkler, 3.0);
        let d = ThresholdDecision::new(config).unwrap();
        let scores = set(&[(Algorithm::Levenshtein, 0.5), (Algorithm::JaroWinkler, 0.9)]);
        // (0.5 + 3 * 0.9) / 4 = 0.8
        assert!((d.rank_score(&scores).value() - 0.8).abs() < 1e-9);
        assert!(d.decide(&scores));
    }

    #[test]
    fn test_rank_score_uses_primary() {
        let d = ThresholdDecision::new(DecisionConfig::default()).unwrap();
        let scores = set(&[(Algorithm::WeightedRatio, 0.6), (Algorithm::Levenshtein, 0.9)]);
        assert_eq!(d.rank_score(&scores), s(0.6));
        assert_eq!(d.rank_score(&ScoreSet::new()), SimilarityScore::ZERO);
    }

    #[test]
    fn test_reasons_list_passing_scores() {
        let d = ThresholdDecision::new(DecisionConfig {
            quorum: QuorumMode::AtLeast(2),
            threshold: 0.8,
            ..Default::default()
        })
        .unwrap();
        let scores = set(&[
            (Algorithm::Levenshtein, 0.9),
            (Algorithm::JaroWinkler, 0.5),
            (Algorithm::WeightedRatio, 0.8),
        ]);

        assert_eq!(
            d.reasons(&scores),
            vec![
                MatchReason::Passed {
                    algorithm: Algorithm::Levenshtein,
                    score: s(0.9),
                    threshold: 0.8,
                },
                MatchReason::Passed {
                    algorithm: Algorithm::WeightedRatio,
                    score: s(0.8),
                    threshold: 0.8,
                },
                MatchReason::Quorum {
                    mode: QuorumMode::AtLeast(2),
                    passed: 2,
                    total: 3,
                    score: s(0.8),
                    accepted: true,
                },
            ]
        );
    }

    #[test]
    fn test_config_serde() {
        let json = r#"{"primary_algorithm":"jaro_winkler","quorum":{"at_least":2}}"#;
        let config: DecisionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.primary_algorithm, Algorithm::JaroWinkler);
        assert_eq!(config.quorum, QuorumMode::AtLeast(2));
        assert_eq!(config.threshold, 0.85);
    }
}
