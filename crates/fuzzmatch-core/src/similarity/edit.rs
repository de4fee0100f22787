//! Edit-distance based similarity
//!
//! Distances come from `strsim` and are normalized by the longer input's
//! char count. Jaro-Winkler applies its prefix boost here so the scaling
//! factor stays configurable.

use strsim::{jaro, normalized_levenshtein, osa_distance};

/// Jaro score above which the Winkler prefix boost applies
const WINKLER_BOOST_THRESHOLD: f64 = 0.7;

/// Longest common prefix considered by the Winkler boost
const WINKLER_MAX_PREFIX: usize = 4;

/// `1 - levenshtein(a, b) / max(len(a), len(b), 1)`
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// Like [`levenshtein_similarity`] with adjacent transposition as a single edit.
///
/// Uses the restricted (optimal string alignment) distance, which needs three
/// rows of memory instead of a full matrix.
pub fn damerau_levenshtein_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - osa_distance(a, b) as f64 / longest as f64
}

/// Jaro similarity boosted by the shared prefix (up to 4 chars) times `prefix_scale`.
///
/// `prefix_scale` must be in `[0, 0.25]` for the result to stay in `[0, 1]`.
pub fn jaro_winkler_similarity(a: &str, b: &str, prefix_scale: f64) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Greedy match search walks the first argument; fix the order so the
    // score does not depend on which side the caller passed first
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    let sim = jaro(a, b);
    if sim <= WINKLER_BOOST_THRESHOLD {
        return sim;
    }

    let prefix = a
        .chars()
        .zip(b.chars())
        .take(WINKLER_MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    (sim + prefix as f64 * prefix_scale * (1.0 - sim)).min(1.0)
}
