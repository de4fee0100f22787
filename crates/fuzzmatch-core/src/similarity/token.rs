//! Ratio family: indel ratio, partial alignment and token reconstructions
//!
//! All functions work on chars and return a value in `[0, 1]`.
//! Two empty inputs score 1.0, one empty input scores 0.0.

use std::collections::BTreeSet;

use ahash::AHashMap;

use super::WeightedRatioWeights;

/// Normalized indel similarity: `2 * lcs(a, b) / (len(a) + len(b))`
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let (pattern, text) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    (2 * LcsPattern::new(pattern).lcs_len(text)) as f64 / total as f64
}

/// Bit-parallel LCS (Hyyrö) against a fixed pattern.
///
/// One bit per pattern char, so a text costs `len(text) * ceil(len(pattern) / 64)`
/// word operations.
struct LcsPattern {
    masks: AHashMap<char, Vec<u64>>,
    len: usize,
    words: usize,
}

impl LcsPattern {
    fn new(pattern: &[char]) -> Self {
        let words = pattern.len().div_ceil(64);
        let mut masks: AHashMap<char, Vec<u64>> = AHashMap::new();
        for (i, &c) in pattern.iter().enumerate() {
            masks.entry(c).or_insert_with(|| vec![0; words])[i / 64] |= 1 << (i % 64);
        }
        Self {
            masks,
            len: pattern.len(),
            words,
        }
    }

    fn lcs_len(&self, text: &[char]) -> usize {
        if self.len == 0 || text.is_empty() {
            return 0;
        }
        // Zero bits mark pattern positions matched so far
        let mut v = vec![u64::MAX; self.words];
        for c in text {
            let Some(mask) = self.masks.get(c) else {
                continue;
            };
            let mut carry = 0u64;
            for (word, &m) in v.iter_mut().zip(mask) {
                let matched = *word & m;
                let (sum, c1) = word.overflowing_add(matched);
                let (sum, c2) = sum.overflowing_add(carry);
                carry = u64::from(c1 || c2);
                *word = sum | (*word - matched);
            }
        }

        let tail = self.len % 64;
        v.iter()
            .enumerate()
            .map(|(i, &word)| {
                let word = if i + 1 == self.words && tail != 0 {
                    word | (u64::MAX << tail)
                } else {
                    word
                };
                word.count_zeros() as usize
            })
            .sum()
    }
}

/// Word-operation budget up to which `partial_ratio` scores every window
const EXHAUSTIVE_WINDOW_BUDGET: usize = 1 << 22;

/// Windows scored once the budget is exceeded
const MAX_ANCHORED_WINDOWS: usize = 64;

/// Best [`ratio`] of the shorter string against an equal-length window of the longer.
///
/// Every window is scored while that fits [`EXHAUSTIVE_WINDOW_BUDGET`]. Beyond
/// it only windows on the diagonals where the most chars line up are scored,
/// which keeps the cost near `len(a) * len(b)`.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long, short_str, long_str) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars, a, b)
    } else {
        (b_chars, a_chars, b, a)
    };

    if short.len() == long.len() {
        return ratio_chars(&short, &long);
    }

    if contains(long_str, short_str) {
        return 1.0;
    }

    let pattern = LcsPattern::new(&short);
    let window_count = long.len() - short.len() + 1;
    let cost = window_count
        .saturating_mul(pattern.words)
        .saturating_mul(short.len());
    let starts: Vec<usize> = if cost <= EXHAUSTIVE_WINDOW_BUDGET {
        (0..window_count).collect()
    } else {
        anchored_starts(&short, &long)
    };

    let mut best = 0;
    for start in starts {
        best = best.max(pattern.lcs_len(&long[start..start + short.len()]));
        if best == short.len() {
            break;
        }
    }
    best as f64 / short.len() as f64
}

/// Window starts on the diagonals `j - i` with the most `short[i] == long[j]` pairs
fn anchored_starts(short: &[char], long: &[char]) -> Vec<usize> {
    let mut positions: AHashMap<char, Vec<usize>> = AHashMap::new();
    for (i, &c) in short.iter().enumerate() {
        positions.entry(c).or_default().push(i);
    }

    // Indexed by `j - i + len(short)`
    let mut votes = vec![0u32; long.len() + short.len()];
    for (j, c) in long.iter().enumerate() {
        if let Some(indices) = positions.get(c) {
            for &i in indices {
                votes[j + short.len() - i] += 1;
            }
        }
    }

    let mut diagonals: Vec<(u32, usize)> = votes
        .iter()
        .enumerate()
        .filter_map(|(d, &v)| (v > 0).then_some((v, d)))
        .collect();
    diagonals.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let last_start = long.len() - short.len();
    let mut starts = Vec::with_capacity(MAX_ANCHORED_WINDOWS);
    for (_, d) in diagonals {
        let start = d.saturating_sub(short.len()).min(last_start);
        if !starts.contains(&start) {
            starts.push(start);
            if starts.len() == MAX_ANCHORED_WINDOWS {
                break;
            }
        }
    }
    starts
}

/// Substring test, SIMD via memchr on native
#[cfg(all(not(target_arch = "wasm32"), feature = "simd"))]
fn contains(haystack: &str, needle: &str) -> bool {
    memchr::memmem::find(haystack.as_bytes(), needle.as_bytes()).is_some()
}

#[cfg(any(target_arch = "wasm32", not(feature = "simd")))]
fn contains(haystack: &str, needle: &str) -> bool {
    haystack.contains(needle)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// [`ratio`] after sorting whitespace tokens alphabetically
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Token-set reconstructions: sorted intersection, and intersection followed by
/// each side's sorted remainder.
fn token_set_parts(a: &str, b: &str) -> Option<(String, String, String)> {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return None;
    }

    let common = join(set_a.intersection(&set_b));
    let only_a = join(set_a.difference(&set_b));
    let only_b = join(set_b.difference(&set_a));

    let with_a = join_nonempty(&common, &only_a);
    let with_b = join_nonempty(&common, &only_b);
    Some((common, with_a, with_b))
}

fn join<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

fn empty_inputs(a: &str, b: &str) -> Option<f64> {
    match (a.trim().is_empty(), b.trim().is_empty()) {
        (true, true) => Some(1.0),
        (true, false) | (false, true) => Some(0.0),
        _ => None,
    }
}

/// Max pairwise [`ratio`] of the token-set reconstructions
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    if let Some(score) = empty_inputs(a, b) {
        return score;
    }
    match token_set_parts(a, b) {
        Some((common, with_a, with_b)) => ratio(&common, &with_a)
            .max(ratio(&common, &with_b))
            .max(ratio(&with_a, &with_b)),
        None => 0.0,
    }
}

fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    match token_set_parts(a, b) {
        Some((common, with_a, with_b)) => partial_ratio(&common, &with_a)
            .max(partial_ratio(&common, &with_b))
            .max(partial_ratio(&with_a, &with_b)),
        None => 0.0,
    }
}

/// Composite of ratio, token-sort and token-set scores.
///
/// When the inputs have similar lengths (length ratio below
/// `partial_length_ratio`) the token scores are scaled by `unbase_scale`.
/// Otherwise partial variants are used instead, additionally scaled by
/// `partial_scale`, or by `long_partial_scale` once the length ratio reaches
/// `long_length_ratio`. The result is the maximum of the candidates.
pub fn weighted_ratio(a: &str, b: &str, weights: &WeightedRatioWeights) -> f64 {
    if let Some(score) = empty_inputs(a, b) {
        return score;
    }

    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let base = ratio(a, b);

    if len_ratio < weights.partial_length_ratio {
        let sort = token_sort_ratio(a, b) * weights.unbase_scale;
        let set = token_set_ratio(a, b) * weights.unbase_scale;
        return base.max(sort).max(set);
    }

    let partial_scale = if len_ratio < weights.long_length_ratio {
        weights.partial_scale
    } else {
        weights.long_partial_scale
    };
    let partial = partial_ratio(a, b) * partial_scale;
    let partial_sort = partial_token_sort_ratio(a, b) * weights.unbase_scale * partial_scale;
    let partial_set = partial_token_set_ratio(a, b) * weights.unbase_scale * partial_scale;
    base.max(partial).max(partial_sort).max(partial_set)
}
