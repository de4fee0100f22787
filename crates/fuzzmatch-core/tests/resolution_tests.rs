//! End-to-end comparison and resolution tests for MatchEngine

use fuzzmatch_core::{
    Algorithm, CandidateSource, CorpusEntry, DecisionConfig, EngineConfig, FullScan, MatchEngine,
    MatchError, MatchReason, PhoneticAlgorithm, QuorumMode,
};
use std::time::{Duration, Instant};
use serde_json::Map;

/// Engine with a few registered people and organizations
fn populated_engine(config: EngineConfig) -> MatchEngine {
    let engine = MatchEngine::with_config(config).unwrap();
    engine
        .register("P1", "John Smith", ["Johnny Smith"], Map::new())
        .unwrap();
    engine
        .register("P2", "Maria Garcia", Vec::<&str>::new(), Map::new())
        .unwrap();
    engine
        .register("O1", "Apple Inc.", ["Apple Computer"], Map::new())
        .unwrap();
    engine
}

#[test]
fn test_compare_legal_suffix_variants() {
    let engine = MatchEngine::new();
    let result = engine.compare("Apple Inc.", "Apple Incorporated").unwrap();

    assert!(result.is_match);
    assert_eq!(result.canonical.a.as_str(), "apple inc");
    assert_eq!(result.canonical.b.as_str(), "apple incorporated");
    let weighted = result.scores[&Algorithm::WeightedRatio].value();
    assert!(weighted >= 0.85, "weighted ratio was {weighted}");
}

#[test]
fn test_compare_unrelated_names() {
    let engine = MatchEngine::new();
    let result = engine.compare("Apple Inc.", "Microsoft Corporation").unwrap();
    assert!(!result.is_match);
}

#[test]
fn test_find_best_matches_ranks_typo_first() {
    let engine = MatchEngine::new();
    let candidates = ["Jane Doe", "Jonathan Doering", "John Doe"];
    let matches = engine
        .find_best_matches("Jonh Doe", &candidates, "jaro_winkler", 0.7, 5)
        .unwrap();

    assert_eq!(matches[0].candidate, "John Doe");
    assert_eq!(matches[0].position, 2);
    assert!(matches.iter().all(|m| m.score.value() >= 0.7));
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_find_best_matches_respects_limit_and_order() {
    let engine = MatchEngine::new();
    let candidates = ["ACME Ltd", "acme ltd", "Acme, Ltd.", "Zenith"];
    let matches = engine
        .find_best_matches("acme ltd", &candidates, "levenshtein", 0.9, 2)
        .unwrap();

    let positions: Vec<usize> = matches.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[test]
fn test_unknown_algorithm() {
    let engine = MatchEngine::new();
    let err = engine
        .find_best_matches("a", &["b"], "soundex2", 0.5, 5)
        .unwrap_err();
    assert_eq!(err, MatchError::UnknownAlgorithm("soundex2".into()));
}

#[test]
fn test_disabled_algorithm_is_unknown() {
    let config = EngineConfig {
        algorithms: vec![Algorithm::WeightedRatio, Algorithm::Levenshtein],
        ..Default::default()
    };
    let engine = MatchEngine::with_config(config).unwrap();
    let err = engine
        .find_best_matches("a", &["b"], "jaro_winkler", 0.5, 5)
        .unwrap_err();
    assert_eq!(err, MatchError::UnknownAlgorithm("jaro_winkler".into()));
}

#[test]
fn test_invalid_configuration_rejected() {
    let mut config = EngineConfig::default();
    config.decision.threshold = 1.2;
    assert!(matches!(
        MatchEngine::with_config(config),
        Err(MatchError::InvalidConfiguration(_))
    ));

    let config = EngineConfig {
        algorithms: vec![Algorithm::Levenshtein],
        ..Default::default()
    };
    assert!(matches!(
        MatchEngine::with_config(config),
        Err(MatchError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_input_too_large() {
    let config = EngineConfig {
        max_input_chars: 16,
        ..Default::default()
    };
    let engine = MatchEngine::with_config(config).unwrap();
    let long = "x".repeat(17);

    assert_eq!(
        engine.compare(&long, "x").unwrap_err(),
        MatchError::InputTooLarge { len: 17, limit: 16 }
    );
    // One oversized corpus entry fails the whole request
    let corpus = vec![CorpusEntry::from("short"), CorpusEntry::from(long.as_str())];
    assert!(matches!(
        engine.resolve("short", &corpus),
        Err(MatchError::InputTooLarge { .. })
    ));
}

#[test]
fn test_limit_counts_canonical_chars() {
    let config = EngineConfig {
        max_input_chars: 5,
        ..Default::default()
    };
    let engine = MatchEngine::with_config(config).unwrap();
    // Punctuation and padding are gone before the check
    assert!(engine.compare("  a.b.c.d.e  ", "abcde").is_ok());
}

#[test]
fn test_find_by_name_phonetic_candidate() {
    let engine = populated_engine(EngineConfig::default());

    let found = engine.resolve_entity("Jon Smith").unwrap().unwrap();
    assert_eq!(found.profile.id, "P1");
    assert_eq!(found.matched_name.as_str(), "John Smith");
    assert!(!found.used_full_scan);

    assert!(engine.find_by_name("Wei Zhang").unwrap().is_none());
    assert!(engine.find_by_name("   ").unwrap().is_none());
}

#[test]
fn test_find_by_name_alternate() {
    let engine = populated_engine(EngineConfig::default());
    let found = engine.resolve_entity("apple computer").unwrap().unwrap();
    assert_eq!(found.profile.id, "O1");
    assert_eq!(found.matched_name.as_str(), "Apple Computer");
}

#[test]
fn test_full_scan_fallback() {
    let mut config = EngineConfig::default();
    config.resolution.full_scan = FullScan::UpTo(100);
    let engine = populated_engine(config);

    // "the apple inc" keys under T, the stored name under A
    let found = engine.resolve_entity("The Apple Inc").unwrap().unwrap();
    assert_eq!(found.profile.id, "O1");
    assert!(found.used_full_scan);

    let strict = populated_engine(EngineConfig::default());
    assert!(strict.resolve_entity("The Apple Inc").unwrap().is_none());
}

#[test]
fn test_resolve_mixed_corpus() {
    let engine = populated_engine(EngineConfig::default());
    let corpus = vec![
        CorpusEntry::from("Mary Garcia"),
        CorpusEntry::Entity("P2".into()),
        CorpusEntry::Entity("missing".into()),
    ];
    let ranked = engine.resolve("maria garcia", &corpus).unwrap();

    assert_eq!(ranked.len(), 2);
    assert_eq!(
        ranked[0].source,
        CandidateSource::Entity {
            id: "P2".into(),
            name: "Maria Garcia".into()
        }
    );
    assert!(ranked[0].accepted);
    assert_eq!(ranked[1].position, 0);
}

#[test]
fn test_compare_with_quorum() {
    let engine = MatchEngine::new();
    let decision = DecisionConfig {
        quorum: QuorumMode::All,
        threshold: 0.9,
        ..Default::default()
    };
    let algorithms = [Algorithm::Levenshtein, Algorithm::TokenSortRatio];

    let swapped = engine
        .compare_with("Doe John", "John Doe", &algorithms, Some(&decision))
        .unwrap();
    // Token sort agrees, character edit distance does not
    assert!(!swapped.is_match);
    assert_eq!(swapped.scores[&Algorithm::TokenSortRatio].value(), 1.0);

    let same = engine
        .compare_with("John Doe", "john doe", &algorithms, Some(&decision))
        .unwrap();
    assert!(same.is_match);
}

#[test]
fn test_compare_explains_decision() {
    let engine = MatchEngine::new();

    let result = engine.compare("Apple Inc.", "Apple Incorporated").unwrap();
    assert!(result.reasons.iter().any(|r| matches!(
        r,
        MatchReason::Passed { algorithm: Algorithm::WeightedRatio, .. }
    )));
    let quorum = result
        .reasons
        .iter()
        .find_map(|r| match r {
            MatchReason::Quorum { mode, accepted, .. } => Some((*mode, *accepted)),
            _ => None,
        })
        .unwrap();
    assert_eq!(quorum, (QuorumMode::Primary, true));

    let result = engine.compare("Smith", "Smyth").unwrap();
    let soundex = result
        .phonetic
        .iter()
        .find(|p| p.encoder == PhoneticAlgorithm::Soundex)
        .unwrap();
    let expected = MatchReason::Phonetic {
        encoder: PhoneticAlgorithm::Soundex,
        code: soundex.a.clone(),
    };
    let phonetic_at = result.reasons.iter().position(|r| *r == expected).unwrap();
    let quorum_at = result
        .reasons
        .iter()
        .position(|r| matches!(r, MatchReason::Quorum { .. }))
        .unwrap();
    assert!(quorum_at < phonetic_at);
}

/// Space-separated words cycling through a fixed vocabulary, cut to `chars`
fn long_name(chars: usize, offset: usize) -> String {
    const WORDS: [&str; 8] = [
        "north", "river", "holdings", "maple", "trust", "quartz", "valley", "jade",
    ];
    let mut out = String::new();
    let mut i = offset;
    while out.len() < chars {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(WORDS[i % WORDS.len()]);
        i = (i * 5 + 3) % WORDS.len();
    }
    out.truncate(chars);
    out.trim_end().to_string()
}

#[test]
fn test_compare_near_input_cap_finishes_quickly() {
    let config = EngineConfig {
        max_input_chars: 2_000,
        ..EngineConfig::default()
    };
    let engine = MatchEngine::with_config(config).unwrap();
    let a = long_name(1_990, 1);
    let b = long_name(1_000, 2);

    let started = Instant::now();
    let result = engine.compare(&a, &b);
    let elapsed = started.elapsed();

    assert!(result.is_ok());
    assert!(elapsed < Duration::from_secs(10), "compare took {elapsed:?}");
}
