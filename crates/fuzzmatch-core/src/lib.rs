//! Fuzzmatch Core Engine
//!
//! Fuzzy string comparison and entity resolution: a normalization pipeline,
//! edit-distance and token-based similarity algorithms, phonetic encoders
//! for candidate filtering, and a resolver over an in-memory entity index.
//!
//! # Features
//!
//! - `native` - Enable all native optimizations (SIMD, parallel, phonetic)
//! - `simd` - SIMD-accelerated substring search via memchr
//! - `parallel` - Bounded rayon worker pool for batch resolution
//! - `phonetic` - Double Metaphone encoder via rphonetic
//!
//! Every feature has a pure-Rust fallback.
//!
//! # Example
//!
//! ```rust
//! use fuzzmatch_core::MatchEngine;
//!
//! let engine = MatchEngine::new();
//!
//! // Compare two strings
//! let result = engine.compare("Apple Inc.", "Apple Incorporated").unwrap();
//! assert!(result.is_match);
//!
//! // Rank free-text candidates
//! let matches = engine
//!     .find_best_matches("Jonh Doe", &["John Doe", "Jane Doe"], "jaro_winkler", 0.7, 5)
//!     .unwrap();
//! assert_eq!(matches[0].candidate, "John Doe");
//! ```

pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod index;
pub mod name;
pub mod normalize;
pub mod phonetic;
pub mod resolver;
pub mod scorer;
pub mod similarity;
pub mod workers;

// Re-export main types at crate root
pub use config::{EngineConfig, FullScan, ResolutionConfig, WorkerConfig};
pub use decision::{
    decide, DecisionConfig, DecisionStrategy, MatchReason, QuorumMode, ThresholdDecision, TieBreak,
};
pub use engine::{BestMatch, CanonicalPair, Comparison, MatchEngine, PhoneticComparison};
pub use error::{MatchError, Result};
pub use index::{EntityIndex, EntityProfile, EntityProfileBuilder, IndexStats, MemoryIndex};
pub use name::{CanonicalName, RawName};
pub use normalize::{normalize, Normalizer, StepKind};
pub use phonetic::{PhoneticAlgorithm, PhoneticCode, PhoneticEncoder};
pub use resolver::{CandidateSource, CorpusEntry, EntityResolver, MatchCandidate, ResolvedEntity};
pub use scorer::MatchScorer;
pub use similarity::{Algorithm, ScoreSet, SimilarityParams, SimilarityScore, WeightedRatioWeights};
