//! MatchEngine - string comparison and entity resolution facade

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::EngineConfig;
use crate::decision::{DecisionConfig, DecisionStrategy, MatchReason, QuorumMode, ThresholdDecision};
use crate::error::{check_range, MatchError, Result};
use crate::index::{EntityIndex, EntityProfile, MemoryIndex};
use crate::name::{CanonicalName, RawName};
use crate::normalize::Normalizer;
use crate::phonetic::{PhoneticAlgorithm, PhoneticCode, PhoneticEncoder};
use crate::resolver::{CandidateSource, CorpusEntry, EntityResolver, MatchCandidate, ResolvedEntity};
use crate::scorer::MatchScorer;
use crate::similarity::{Algorithm, ScoreSet, SimilarityScore};

/// Algorithm used by [`MatchEngine::find_best_matches_default`]
pub const DEFAULT_BEST_MATCH_ALGORITHM: Algorithm = Algorithm::TokenSetRatio;

/// Threshold used by [`MatchEngine::find_best_matches_default`]
pub const DEFAULT_BEST_MATCH_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalPair {
    pub a: CanonicalName,
    pub b: CanonicalName,
}

/// Codes of both inputs under one encoder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhoneticComparison {
    pub encoder: PhoneticAlgorithm,
    pub a: PhoneticCode,
    pub b: PhoneticCode,
    /// Both codes non-empty and equal
    pub matches: bool,
}

/// Outcome of comparing two strings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub is_match: bool,
    pub scores: ScoreSet,
    /// Passing algorithms and quorum outcome, then phonetic agreement
    pub reasons: Vec<MatchReason>,
    pub canonical: CanonicalPair,
    /// Informational; not part of the decision
    pub phonetic: Vec<PhoneticComparison>,
}

/// One `find_best_matches` hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMatch {
    pub candidate: String,
    pub score: SimilarityScore,
    /// Index in the candidate list as given
    pub position: usize,
}

/// Entry point for comparing strings and resolving entities.
///
/// Owns an in-memory entity index; every other component is stateless.
pub struct MatchEngine {
    config: EngineConfig,
    normalizer: Normalizer,
    scorer: MatchScorer,
    decision: ThresholdDecision,
    index: Arc<MemoryIndex>,
    resolver: EntityResolver,
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .field("scorer", &self.scorer)
            .field("decision", &self.decision)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine {
    /// Create a new MatchEngine with default configuration
    pub fn new() -> Self {
        let index = Arc::new(MemoryIndex::default());
        Self {
            config: EngineConfig::default(),
            normalizer: Normalizer::default(),
            scorer: MatchScorer::default(),
            decision: ThresholdDecision::default(),
            resolver: EntityResolver::new(index.clone()),
            index,
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = config.normalizer();
        let index = Arc::new(
            MemoryIndex::new(normalizer.clone(), config.phonetic_encoder)
                .with_candidate_limit(config.resolution.candidate_limit)?,
        );
        let resolver = EntityResolver::from_config(index.clone(), &config)?;
        debug!(
            algorithms = config.algorithms.len(),
            encoder = config.phonetic_encoder.name(),
            "Match engine configured"
        );
        Ok(Self {
            scorer: MatchScorer::new(
                config.algorithms.iter().copied(),
                config.similarity.clone(),
                config.max_input_chars,
            )?,
            decision: ThresholdDecision::new(config.decision.clone())?,
            normalizer,
            index,
            resolver,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn index(&self) -> &MemoryIndex {
        &self.index
    }

    pub fn normalize(&self, raw: &str) -> CanonicalName {
        self.normalizer.normalize_str(raw)
    }

    /// Compare with every enabled algorithm under the configured decision policy
    pub fn compare(&self, a: &str, b: &str) -> Result<Comparison> {
        let algorithms = self.config.algorithms.clone();
        self.compare_inner(a, b, &algorithms, &self.decision)
    }

    /// Compare with an explicit algorithm set and, optionally, decision policy.
    ///
    /// Under `primary` quorum the primary algorithm must be among `algorithms`.
    pub fn compare_with(
        &self,
        a: &str,
        b: &str,
        algorithms: &[Algorithm],
        decision: Option<&DecisionConfig>,
    ) -> Result<Comparison> {
        let decision = match decision {
            Some(config) => ThresholdDecision::new(config.clone())?,
            None => self.decision.clone(),
        };
        let config = decision.config();
        if config.quorum == QuorumMode::Primary && !algorithms.contains(&config.primary_algorithm) {
            return Err(MatchError::config(format!(
                "primary algorithm '{}' is not among the requested algorithms",
                config.primary_algorithm
            )));
        }
        self.compare_inner(a, b, algorithms, &decision)
    }

    fn compare_inner(
        &self,
        a: &str,
        b: &str,
        algorithms: &[Algorithm],
        decision: &dyn DecisionStrategy,
    ) -> Result<Comparison> {
        let canonical = CanonicalPair {
            a: self.normalize(a),
            b: self.normalize(b),
        };
        let scores = self.scorer.score_all(&canonical.a, &canonical.b, algorithms)?;
        let phonetic: Vec<PhoneticComparison> = PhoneticAlgorithm::ALL
            .into_iter()
            .map(|encoder| {
                let code_a = encoder.encode(canonical.a.as_str());
                let code_b = encoder.encode(canonical.b.as_str());
                PhoneticComparison {
                    encoder,
                    matches: !code_a.is_empty() && code_a == code_b,
                    a: code_a,
                    b: code_b,
                }
            })
            .collect();

        let mut reasons = decision.reasons(&scores);
        reasons.extend(phonetic.iter().filter(|p| p.matches).map(|p| MatchReason::Phonetic {
            encoder: p.encoder,
            code: p.a.clone(),
        }));

        Ok(Comparison {
            is_match: decision.decide(&scores),
            scores,
            reasons,
            canonical,
            phonetic,
        })
    }

    /// Register an entity, replacing any entity with the same id
    pub fn register(
        &self,
        id: impl Into<String>,
        primary_name: impl Into<RawName>,
        alternate_names: impl IntoIterator<Item = impl Into<RawName>>,
        attributes: Map<String, Value>,
    ) -> Result<()> {
        let profile = EntityProfile::builder(id, primary_name)
            .alternate_names(alternate_names)
            .attributes(attributes)
            .build();
        self.save(profile)
    }

    /// Store a fully built profile
    pub fn save(&self, profile: EntityProfile) -> Result<()> {
        self.index.save(profile)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Arc<EntityProfile>> {
        self.index.find_by_id(id)
    }

    pub fn delete(&self, id: &str) -> bool {
        self.index.delete(id)
    }

    /// Best accepted entity for `name`, if any
    pub fn find_by_name(&self, name: &str) -> Result<Option<Arc<EntityProfile>>> {
        Ok(self.resolve_entity(name)?.map(|resolved| resolved.profile))
    }

    /// Like [`find_by_name`](Self::find_by_name), with the matched name and score
    pub fn resolve_entity(&self, name: &str) -> Result<Option<ResolvedEntity>> {
        self.resolver.find_by_name(&RawName::from(name))
    }

    /// Rank a corpus of names or entity ids against `query`
    pub fn resolve(&self, query: &str, corpus: &[CorpusEntry]) -> Result<Vec<MatchCandidate>> {
        self.resolver.resolve(&RawName::from(query), corpus)
    }

    /// Candidates scoring at least `threshold` under `algorithm`, best first, at most `limit`.
    ///
    /// Equal scores keep input order.
    pub fn find_best_matches<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[S],
        algorithm: &str,
        threshold: f64,
        limit: usize,
    ) -> Result<Vec<BestMatch>> {
        let algorithm: Algorithm = algorithm.parse()?;
        check_range("threshold", threshold, 0.0, 1.0)?;
        if limit == 0 {
            return Err(MatchError::config("limit must be positive"));
        }
        let decision = ThresholdDecision::new(DecisionConfig::primary(algorithm, threshold))?;

        let corpus: Vec<CorpusEntry> = candidates
            .iter()
            .map(|c| CorpusEntry::from(c.as_ref()))
            .collect();
        let ranked = self
            .resolver
            .resolve_with(&RawName::from(query), &corpus, &[algorithm], &decision)?;

        Ok(ranked
            .into_iter()
            .filter(|c| c.accepted)
            .take(limit)
            .map(|c| BestMatch {
                candidate: match c.source {
                    CandidateSource::Name { name } => name.into_inner(),
                    CandidateSource::Entity { name, .. } => name.into_inner(),
                },
                score: c.score,
                position: c.position,
            })
            .collect())
    }

    /// [`find_best_matches`](Self::find_best_matches) with token-set ratio,
    /// threshold 0.7 and the configured result limit
    pub fn find_best_matches_default<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[S],
    ) -> Result<Vec<BestMatch>> {
        self.find_best_matches(
            query,
            candidates,
            DEFAULT_BEST_MATCH_ALGORITHM.name(),
            DEFAULT_BEST_MATCH_THRESHOLD,
            self.config.result_limit,
        )
    }
}
