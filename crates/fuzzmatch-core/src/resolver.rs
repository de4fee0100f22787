//! Entity resolution
//!
//! Two entry points:
//!
//! - [`EntityResolver::resolve`] ranks a caller-supplied corpus of names or
//!   entity ids against a query.
//! - [`EntityResolver::find_by_name`] looks a query up in the entity index:
//!   exact canonical match first, then phonetic candidates, then (only when
//!   configured) a bounded full scan.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{EngineConfig, FullScan};
use crate::decision::{DecisionConfig, DecisionStrategy, QuorumMode, ThresholdDecision};
use crate::error::Result;
use crate::index::{EntityIndex, EntityProfile};
use crate::name::{CanonicalName, RawName};
use crate::normalize::Normalizer;
use crate::scorer::MatchScorer;
use crate::similarity::{Algorithm, ScoreSet, SimilarityScore};
use crate::workers::WorkerPool;

/// One corpus element: free text, or the id of an indexed entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusEntry {
    Name(RawName),
    Entity(String),
}

impl From<&str> for CorpusEntry {
    fn from(value: &str) -> Self {
        Self::Name(RawName::from(value))
    }
}

impl From<RawName> for CorpusEntry {
    fn from(value: RawName) -> Self {
        Self::Name(value)
    }
}

/// Where a candidate came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateSource {
    Name { name: RawName },
    /// Indexed entity, scored through its best-matching name
    Entity { id: String, name: RawName },
}

/// A scored corpus element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub source: CandidateSource,
    /// Index in the corpus as given
    pub position: usize,
    pub canonical: CanonicalName,
    pub scores: ScoreSet,
    /// Ranking score under the decision strategy
    pub score: SimilarityScore,
    pub accepted: bool,
}

/// Result of a successful name lookup
#[derive(Debug, Clone)]
pub struct ResolvedEntity {
    pub profile: Arc<EntityProfile>,
    /// The primary or alternate name that matched
    pub matched_name: RawName,
    pub score: SimilarityScore,
    /// Whether candidates came from the full-index fallback
    pub used_full_scan: bool,
}

/// Corpus element with its names normalized, ready to score
struct Target {
    position: usize,
    id: Option<String>,
    names: Vec<(RawName, CanonicalName)>,
}

pub struct EntityResolver {
    index: Arc<dyn EntityIndex>,
    normalizer: Normalizer,
    scorer: MatchScorer,
    algorithms: Vec<Algorithm>,
    decision: ThresholdDecision,
    lookup: ThresholdDecision,
    /// Algorithms scored per name during lookup
    lookup_algorithms: Vec<Algorithm>,
    full_scan: FullScan,
    workers: WorkerPool,
}

impl EntityResolver {
    /// Resolver with the default configuration
    pub fn new(index: Arc<dyn EntityIndex>) -> Self {
        Self {
            index,
            normalizer: Normalizer::default(),
            scorer: MatchScorer::default(),
            algorithms: Algorithm::ALL.to_vec(),
            decision: ThresholdDecision::default(),
            lookup: ThresholdDecision::default(),
            lookup_algorithms: vec![DecisionConfig::default().primary_algorithm],
            full_scan: FullScan::default(),
            workers: WorkerPool::default(),
        }
    }

    /// Build from a validated configuration
    pub fn from_config(index: Arc<dyn EntityIndex>, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let resolution = &config.resolution;
        let lookup = DecisionConfig {
            primary_algorithm: resolution.algorithm,
            threshold: resolution.threshold,
            quorum: resolution.quorum,
            ..config.decision.clone()
        };
        let lookup_algorithms = match resolution.quorum {
            QuorumMode::Primary => vec![resolution.algorithm],
            _ => config.algorithms.clone(),
        };
        Ok(Self {
            index,
            normalizer: config.normalizer(),
            scorer: MatchScorer::new(
                config.algorithms.iter().copied(),
                config.similarity.clone(),
                config.max_input_chars,
            )?,
            algorithms: config.algorithms.clone(),
            decision: ThresholdDecision::new(config.decision.clone())?,
            lookup: ThresholdDecision::new(lookup)?,
            lookup_algorithms,
            full_scan: resolution.full_scan,
            workers: WorkerPool::new(&config.workers)?,
        })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Score every corpus entry against `query`, best first.
    ///
    /// Equal scores keep corpus order. Entity ids missing from the index are
    /// skipped. Large corpora are scored on the worker pool.
    pub fn resolve(&self, query: &RawName, corpus: &[CorpusEntry]) -> Result<Vec<MatchCandidate>> {
        self.resolve_with(query, corpus, &self.algorithms, &self.decision)
    }

    /// [`resolve`](Self::resolve) with explicit algorithms and decision policy
    pub fn resolve_with(
        &self,
        query: &RawName,
        corpus: &[CorpusEntry],
        algorithms: &[Algorithm],
        decision: &dyn DecisionStrategy,
    ) -> Result<Vec<MatchCandidate>> {
        self.rank(query, corpus, algorithms, decision, true)
    }

    /// Same ranking as [`resolve`](Self::resolve), always on the calling thread
    pub fn resolve_sequential(
        &self,
        query: &RawName,
        corpus: &[CorpusEntry],
    ) -> Result<Vec<MatchCandidate>> {
        self.rank(query, corpus, &self.algorithms, &self.decision, false)
    }

    fn rank(
        &self,
        query: &RawName,
        corpus: &[CorpusEntry],
        algorithms: &[Algorithm],
        decision: &dyn DecisionStrategy,
        parallel: bool,
    ) -> Result<Vec<MatchCandidate>> {
        let query = self.normalizer.normalize(query);
        self.scorer.check_input(&query)?;
        for &algorithm in algorithms {
            self.scorer.ensure_registered(algorithm)?;
        }

        // Every length is checked before any pair is scored
        let targets = self.targets(corpus);
        for target in &targets {
            for (_, canonical) in &target.names {
                self.scorer.check_input(canonical)?;
            }
        }

        debug!(
            query = %query,
            corpus = corpus.len(),
            targets = targets.len(),
            parallel,
            "Resolving query against corpus"
        );

        let score = |target: &Target| self.score_target(&query, target, algorithms, decision);
        let scored = if parallel {
            self.workers.map(&targets, score)
        } else {
            WorkerPool::map_sequential(&targets, score)
        };

        let mut candidates: Vec<MatchCandidate> = scored
            .into_iter()
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();
        sort_by_score(&mut candidates, |c| c.score);
        Ok(candidates)
    }

    fn targets(&self, corpus: &[CorpusEntry]) -> Vec<Target> {
        corpus
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| match entry {
                CorpusEntry::Name(raw) => Some(Target {
                    position,
                    id: None,
                    names: vec![(raw.clone(), self.normalizer.normalize(raw))],
                }),
                CorpusEntry::Entity(id) => match self.index.find_by_id(id) {
                    Some(profile) => Some(Target {
                        position,
                        id: Some(profile.id.clone()),
                        names: profile
                            .names()
                            .map(|raw| (raw.clone(), self.normalizer.normalize(raw)))
                            .collect(),
                    }),
                    None => {
                        debug!(entity_id = %id, "Corpus entity not in index, skipping");
                        None
                    }
                },
            })
            .collect()
    }

    /// Best-scoring name of `target`; first name wins ties
    fn score_target(
        &self,
        query: &CanonicalName,
        target: &Target,
        algorithms: &[Algorithm],
        decision: &dyn DecisionStrategy,
    ) -> Result<Option<MatchCandidate>> {
        let mut best: Option<MatchCandidate> = None;
        for (raw, canonical) in &target.names {
            let scores = self.scorer.score_all(query, canonical, algorithms)?;
            let score = decision.rank_score(&scores);
            if best.as_ref().is_some_and(|b| b.score >= score) {
                continue;
            }
            let source = match &target.id {
                Some(id) => CandidateSource::Entity {
                    id: id.clone(),
                    name: raw.clone(),
                },
                None => CandidateSource::Name { name: raw.clone() },
            };
            best = Some(MatchCandidate {
                source,
                position: target.position,
                canonical: canonical.clone(),
                accepted: decision.decide(&scores),
                scores,
                score,
            });
        }
        Ok(best)
    }

    /// Resolve `query` to the best accepted indexed entity.
    pub fn find_by_name(&self, query: &RawName) -> Result<Option<ResolvedEntity>> {
        let canonical = self.normalizer.normalize(query);
        if canonical.is_empty() {
            return Ok(None);
        }
        self.scorer.check_input(&canonical)?;

        if let Some(profile) = self.index.find_by_canonical_name(&canonical) {
            let matched_name = profile
                .names()
                .find(|raw| self.normalizer.normalize(raw) == canonical)
                .cloned()
                .unwrap_or_else(|| profile.primary_name.clone());
            debug!(query = %canonical, entity_id = %profile.id, "Exact canonical match");
            return Ok(Some(ResolvedEntity {
                profile,
                matched_name,
                score: SimilarityScore::ONE,
                used_full_scan: false,
            }));
        }

        let mut candidates = self.index.find_candidates_by_name(&canonical);
        let mut used_full_scan = false;
        if candidates.is_empty() {
            match self.full_scan {
                FullScan::Disabled => {
                    debug!(query = %canonical, "No phonetic candidates, full scan disabled");
                    return Ok(None);
                }
                FullScan::UpTo(limit) => {
                    let entities = self.index.len();
                    if entities > limit {
                        warn!(
                            query = %canonical,
                            entities,
                            limit,
                            "No phonetic candidates and index too large for full scan"
                        );
                        return Ok(None);
                    }
                    warn!(query = %canonical, entities, "No phonetic candidates, scanning full index");
                    candidates = self.index.all_profiles();
                    used_full_scan = true;
                }
            }
        }

        let scored = self
            .workers
            .map(&candidates, |profile| self.best_accepted_name(&canonical, profile));
        let mut best: Option<ResolvedEntity> = None;
        for (profile, result) in candidates.iter().zip(scored) {
            let Some((matched_name, score)) = result? else {
                continue;
            };
            if best.as_ref().is_some_and(|b| b.score >= score) {
                continue;
            }
            best = Some(ResolvedEntity {
                profile: Arc::clone(profile),
                matched_name,
                score,
                used_full_scan,
            });
        }

        debug!(
            query = %canonical,
            candidates = candidates.len(),
            matched = best.as_ref().map(|b| b.profile.id.as_str()),
            "Name lookup finished"
        );
        Ok(best)
    }

    /// Highest accepted score among the profile's names, under the lookup quorum
    fn best_accepted_name(
        &self,
        query: &CanonicalName,
        profile: &Arc<EntityProfile>,
    ) -> Result<Option<(RawName, SimilarityScore)>> {
        let mut best: Option<(RawName, SimilarityScore)> = None;
        for raw in profile.names() {
            let canonical = self.normalizer.normalize(raw);
            if let Err(err) = self.scorer.check_input(&canonical) {
                warn!(entity_id = %profile.id, error = %err, "Skipping oversized entity name");
                continue;
            }
            let scores = self
                .scorer
                .score_all(query, &canonical, &self.lookup_algorithms)?;
            if !self.lookup.decide(&scores) {
                continue;
            }
            let score = self.lookup.rank_score(&scores);
            if best.as_ref().map_or(true, |(_, b)| score > *b) {
                best = Some((raw.clone(), score));
            }
        }
        Ok(best)
    }
}

/// Stable sort, highest score first
pub(crate) fn sort_by_score<T>(items: &mut [T], score: impl Fn(&T) -> SimilarityScore) {
    items.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    fn resolver_with(config: &EngineConfig, profiles: Vec<EntityProfile>) -> EntityResolver {
        let index: Arc<dyn EntityIndex> = Arc::new(MemoryIndex::default());
        for profile in profiles {
            index.save(profile).unwrap();
        }
        EntityResolver::from_config(index, config).unwrap()
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let resolver = resolver_with(&EngineConfig::default(), Vec::new());
        let corpus: Vec<CorpusEntry> = ["acme", "zzz", "ACME!"].into_iter().map(Into::into).collect();
        let ranked = resolver.resolve(&"Acme".into(), &corpus).unwrap();

        let positions: Vec<usize> = ranked.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 2, 1]);
        assert!(ranked[0].accepted);
        assert!(!ranked[2].accepted);
    }

    #[test]
    fn test_entity_entries_use_best_name() {
        let ibm = EntityProfile::builder("E1", "International Business Machines")
            .alternate_name("IBM")
            .build();
        let resolver = resolver_with(&EngineConfig::default(), vec![ibm]);
        let corpus = vec![
            CorpusEntry::Entity("missing".into()),
            CorpusEntry::Entity("E1".into()),
            CorpusEntry::from("IBN"),
        ];
        let ranked = resolver.resolve(&"ibm".into(), &corpus).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(
            ranked[0].source,
            CandidateSource::Entity {
                id: "E1".into(),
                name: "IBM".into()
            }
        );
        assert_eq!(ranked[0].score, SimilarityScore::ONE);
        assert_eq!(ranked[0].position, 1);
    }

    #[test]
    fn test_exact_canonical_match_wins() {
        let resolver = resolver_with(
            &EngineConfig::default(),
            vec![EntityProfile::builder("E1", "Acme Corp").alternate_name("ACME").build()],
        );
        let found = resolver.find_by_name(&"  acme ".into()).unwrap().unwrap();
        assert_eq!(found.profile.id, "E1");
        assert_eq!(found.matched_name.as_str(), "ACME");
        assert_eq!(found.score, SimilarityScore::ONE);
        assert!(!found.used_full_scan);
    }

    #[test]
    fn test_full_scan_is_opt_in() {
        let acme = || vec![EntityProfile::new("E1", "Acme")];
        // "the acme" and "acme" land in different soundex buckets
        let query: RawName = "The Acme".into();

        let disabled = resolver_with(&EngineConfig::default(), acme());
        assert!(disabled.find_by_name(&query).unwrap().is_none());

        let mut config = EngineConfig::default();
        config.resolution.full_scan = FullScan::UpTo(10);
        let found = resolver_with(&config, acme())
            .find_by_name(&query)
            .unwrap()
            .unwrap();
        assert_eq!(found.profile.id, "E1");
        assert!(found.used_full_scan);

        config.resolution.full_scan = FullScan::UpTo(0);
        assert!(resolver_with(&config, acme()).find_by_name(&query).unwrap().is_none());
    }

    #[test]
    fn test_lookup_honours_resolution_quorum() {
        let people = || vec![EntityProfile::new("P1", "John Smith")];
        // Reordered tokens: token scores agree, character edit scores do not
        let query: RawName = "Smith John".into();
        let mut config = EngineConfig::default();
        config.resolution.full_scan = FullScan::UpTo(10);

        let found = resolver_with(&config, people()).find_by_name(&query).unwrap();
        assert_eq!(found.unwrap().profile.id, "P1");

        config.resolution.quorum = QuorumMode::All;
        assert!(resolver_with(&config, people()).find_by_name(&query).unwrap().is_none());
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let mut config = EngineConfig::default();
        config.workers.parallel_threshold = 1;
        let resolver = resolver_with(&config, Vec::new());
        let corpus: Vec<CorpusEntry> = (0..64)
            .map(|i| CorpusEntry::from(format!("acme {i} holdings").as_str()))
            .collect();
        let query: RawName = "acme 7 holding".into();
        assert_eq!(
            resolver.resolve(&query, &corpus).unwrap(),
            resolver.resolve_sequential(&query, &corpus).unwrap()
        );
    }
}
