//! Engine configuration
//!
//! Every field has a default, so an empty JSON object is a complete
//! configuration. [`EngineConfig::validate`] rejects out-of-range values with
//! `MatchError::InvalidConfiguration`.

use serde::{Deserialize, Serialize};

use crate::decision::{DecisionConfig, QuorumMode};
use crate::error::{check_range, MatchError, Result};
use crate::index::DEFAULT_CANDIDATE_LIMIT;
use crate::normalize::{Normalizer, StepKind, DEFAULT_STEPS};
use crate::phonetic::PhoneticAlgorithm;
use crate::scorer::DEFAULT_MAX_INPUT_CHARS;
use crate::similarity::{Algorithm, SimilarityParams};

/// Whether name lookup may score the whole index when phonetic retrieval finds nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullScan {
    #[default]
    Disabled,
    /// Allowed while the index holds at most this many entities
    UpTo(usize),
}

/// Name lookup (`find_by_name`) settings
///
/// Lookup uses its own algorithm, threshold and quorum. Tie break and
/// per-algorithm weights are shared with [`DecisionConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    pub algorithm: Algorithm,
    pub threshold: f64,
    /// `primary` scores only `algorithm`; other modes score every enabled algorithm
    pub quorum: QuorumMode,
    pub candidate_limit: usize,
    pub full_scan: FullScan,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::WeightedRatio,
            threshold: 0.85,
            quorum: QuorumMode::Primary,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            full_scan: FullScan::Disabled,
        }
    }
}

impl ResolutionConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("resolution.threshold", self.threshold, 0.0, 1.0)?;
        if self.quorum == QuorumMode::AtLeast(0) {
            return Err(MatchError::config("resolution.quorum must require at least 1 score"));
        }
        if self.candidate_limit == 0 {
            return Err(MatchError::config("resolution.candidate_limit must be positive"));
        }
        Ok(())
    }
}

/// Batch scoring worker pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Thread cap for batch scoring; `None` uses the global pool
    pub max_threads: Option<usize>,
    /// Batches smaller than this are scored on the calling thread
    pub parallel_threshold: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_threads: None,
            parallel_threshold: 256,
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_threads == Some(0) {
            return Err(MatchError::config("workers.max_threads must be positive"));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Normalization steps, applied in order
    pub normalization: Vec<StepKind>,
    /// Algorithms available to scoring; requests outside this set fail
    pub algorithms: Vec<Algorithm>,
    /// Accept/reject policy for `compare` and `resolve`
    pub decision: DecisionConfig,
    pub resolution: ResolutionConfig,
    /// Encoder keying the entity index
    pub phonetic_encoder: PhoneticAlgorithm,
    pub similarity: SimilarityParams,
    /// Longest canonical name accepted, in chars
    pub max_input_chars: usize,
    /// Default `find_best_matches` limit
    pub result_limit: usize,
    pub workers: WorkerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalization: DEFAULT_STEPS.to_vec(),
            algorithms: Algorithm::ALL.to_vec(),
            decision: DecisionConfig::default(),
            resolution: ResolutionConfig::default(),
            phonetic_encoder: PhoneticAlgorithm::default(),
            similarity: SimilarityParams::default(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            result_limit: 5,
            workers: WorkerConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.algorithms.is_empty() {
            return Err(MatchError::config("algorithms must not be empty"));
        }
        self.require_enabled("decision.primary_algorithm", self.decision.primary_algorithm)?;
        self.require_enabled("resolution.algorithm", self.resolution.algorithm)?;
        self.decision.validate()?;
        self.resolution.validate()?;
        self.similarity.validate()?;
        self.workers.validate()?;
        if self.max_input_chars == 0 {
            return Err(MatchError::config("max_input_chars must be positive"));
        }
        if self.result_limit == 0 {
            return Err(MatchError::config("result_limit must be positive"));
        }
        Ok(())
    }

    fn require_enabled(&self, field: &str, algorithm: Algorithm) -> Result<()> {
        if self.algorithms.contains(&algorithm) {
            Ok(())
        } else {
            Err(MatchError::config(format!(
                "{field} '{algorithm}' is not in the enabled algorithms"
            )))
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.normalization.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.algorithms.len(), 7);
        assert_eq!(config.decision.primary_algorithm, Algorithm::WeightedRatio);
        assert_eq!(config.resolution.full_scan, FullScan::Disabled);
        assert_eq!(config.phonetic_encoder, PhoneticAlgorithm::Soundex);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "algorithms": ["jaro_winkler", "token_set_ratio"],
            "decision": {"primary_algorithm": "token_set_ratio", "threshold": 0.9, "quorum": "majority"},
            "resolution": {"algorithm": "jaro_winkler", "full_scan": {"up_to": 500}},
            "phonetic_encoder": "metaphone",
            "workers": {"max_threads": 4}
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.decision.quorum, QuorumMode::Majority);
        assert_eq!(config.resolution.full_scan, FullScan::UpTo(500));
        assert_eq!(config.resolution.threshold, 0.85);
        assert_eq!(config.resolution.quorum, QuorumMode::Primary);
        assert_eq!(config.workers.parallel_threshold, 256);
    }

    #[test]
    fn test_primary_must_be_enabled() {
        let config = EngineConfig {
            algorithms: vec![Algorithm::Levenshtein],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MatchError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_out_of_range_values() {
        let mut config = EngineConfig::default();
        config.decision.threshold = 1.2;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.similarity.jaro_winkler_prefix_scale = 0.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.workers.max_threads = Some(0);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.resolution.quorum = QuorumMode::AtLeast(0);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.result_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_algorithm_name_in_json() {
        let result: std::result::Result<EngineConfig, _> =
            serde_json::from_str(r#"{"algorithms": ["levenshtein", "cosine"]}"#);
        assert!(result.is_err());
    }
}
