//! String normalization pipeline
//!
//! Applies an ordered list of [`StepKind`] transforms to produce a
//! [`CanonicalName`]. The default order is:
//!
//! 1. Lowercase
//! 2. Strip diacritics (transliterate to base Latin letters)
//! 3. Strip punctuation
//! 4. Collapse whitespace
//!
//! The default pipeline is idempotent: normalizing a canonical name again
//! yields the same canonical name.
//!
//! # Example
//!
//! ```rust
//! use fuzzmatch_core::normalize::Normalizer;
//!
//! let normalizer = Normalizer::default();
//! assert_eq!(normalizer.normalize_str("  Société  Générale, S.A. ").as_str(), "societe generale sa");
//! ```

mod steps;

pub use steps::{
    collapse_whitespace, lowercase, standardize_legal_suffixes, strip_diacritics,
    strip_punctuation, StepKind,
};

use unicode_normalization::UnicodeNormalization;

use crate::name::{CanonicalName, RawName};

/// Step order used when no pipeline is configured
pub const DEFAULT_STEPS: [StepKind; 4] = [
    StepKind::Lowercase,
    StepKind::StripDiacritics,
    StepKind::StripPunctuation,
    StepKind::CollapseWhitespace,
];

/// Ordered, immutable normalization pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    steps: Vec<StepKind>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_STEPS.to_vec())
    }
}

impl Normalizer {
    pub fn new(steps: Vec<StepKind>) -> Self {
        Self { steps }
    }

    /// Default pipeline plus legal-suffix standardization after punctuation removal,
    /// so "Apple, Incorporated" and "Apple Inc." share a canonical form.
    pub fn organizations() -> Self {
        Self::new(vec![
            StepKind::Lowercase,
            StepKind::StripDiacritics,
            StepKind::StripPunctuation,
            StepKind::StandardizeLegalSuffixes,
            StepKind::CollapseWhitespace,
        ])
    }

    pub fn steps(&self) -> &[StepKind] {
        &self.steps
    }

    pub fn normalize(&self, raw: &RawName) -> CanonicalName {
        self.normalize_str(raw.as_str())
    }

    pub fn normalize_str(&self, raw: &str) -> CanonicalName {
        CanonicalName::from_normalized(apply_steps(raw, &self.steps))
    }
}

/// Normalize `raw` with an explicit step order.
pub fn normalize(raw: &RawName, steps: &[StepKind]) -> CanonicalName {
    CanonicalName::from_normalized(apply_steps(raw.as_str(), steps))
}

/// Runs `steps`, then composes the result to NFC.
///
/// Composition happens once at the end: removing a char can leave two
/// composable chars adjacent (e.g. Hangul jamo split by punctuation).
fn apply_steps(raw: &str, steps: &[StepKind]) -> String {
    steps
        .iter()
        .fold(raw.to_string(), |text, step| step.apply(&text))
        .nfc()
        .collect()
}
