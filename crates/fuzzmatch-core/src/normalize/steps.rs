//! Normalization steps
//!
//! Each step is a total `&str -> String` function. Characters a step has no
//! rule for pass through unchanged.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A single text transform in the normalization pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Unicode lowercase
    Lowercase,
    /// Remove combining accents and fold Latin ligatures to base letters
    StripDiacritics,
    /// Drop everything that is not alphanumeric, whitespace or a combining mark
    StripPunctuation,
    /// Collapse whitespace runs to one space and trim
    CollapseWhitespace,
    /// Rewrite company-form words to a canonical abbreviation ("corporation" -> "corp")
    StandardizeLegalSuffixes,
}

impl StepKind {
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Lowercase => lowercase(text),
            Self::StripDiacritics => strip_diacritics(text),
            Self::StripPunctuation => strip_punctuation(text),
            Self::CollapseWhitespace => collapse_whitespace(text),
            Self::StandardizeLegalSuffixes => standardize_legal_suffixes(text),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Lowercase => "lowercase",
            Self::StripDiacritics => "strip_diacritics",
            Self::StripPunctuation => "strip_punctuation",
            Self::CollapseWhitespace => "collapse_whitespace",
            Self::StandardizeLegalSuffixes => "standardize_legal_suffixes",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Canonical decomposition, drop combining marks, recompose.
///
/// Recomposition keeps scripts whose decomposition is not an accent (Hangul)
/// byte-identical.
pub fn strip_diacritics(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match fold_letter(c) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }
    folded.nfc().collect()
}

/// Latin letters with no canonical decomposition
fn fold_letter(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'ł' => "l",
        'Ł' => "L",
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'þ' => "th",
        'Þ' => "TH",
        'ı' => "i",
        _ => return None,
    };
    Some(folded)
}

pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|&c| c.is_alphanumeric() || c.is_whitespace() || is_combining_mark(c))
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Multi-word company forms, matched before single words
const LEGAL_PHRASES: &[(&[&str], &str)] = &[
    (&["public", "limited", "company"], "plc"),
    (&["limited", "liability", "company"], "llc"),
    (&["gmbh", "co", "kg"], "gmbh"),
    (&["societe", "anonyme"], "sa"),
];

const LEGAL_WORDS: &[(&str, &str)] = &[
    ("corporation", "corp"),
    ("corp", "corp"),
    ("incorporated", "inc"),
    ("inc", "inc"),
    ("limited", "ltd"),
    ("ltd", "ltd"),
    ("company", "co"),
    ("co", "co"),
    ("plc", "plc"),
    ("llc", "llc"),
    ("sa", "sa"),
    ("aktiengesellschaft", "ag"),
    ("ag", "ag"),
    ("gmbh", "gmbh"),
    ("holding", "hldg"),
    ("holdings", "hldg"),
    ("hldg", "hldg"),
    ("group", "grp"),
    ("grp", "grp"),
];

/// Token key used for table lookup: lowercase, dots and commas removed ("L.L.C." -> "llc").
fn suffix_key(token: &str) -> String {
    token
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Works on whitespace-delimited tokens; the output joins tokens with single spaces.
///
/// Repeats until nothing changes, so "gmbh company kg" ends as "gmbh".
pub fn standardize_legal_suffixes(text: &str) -> String {
    let mut current = standardize_pass(text);
    loop {
        let next = standardize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

// Phrase replacements shrink the token count, so the loop above terminates
fn standardize_pass(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let keys: Vec<String> = tokens.iter().map(|t| suffix_key(t)).collect();

    let mut out: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    'tokens: while i < tokens.len() {
        for (phrase, replacement) in LEGAL_PHRASES {
            let end = i + phrase.len();
            if end <= keys.len() && keys[i..end].iter().zip(phrase.iter()).all(|(k, p)| k == p) {
                out.push(*replacement);
                i = end;
                continue 'tokens;
            }
        }
        match LEGAL_WORDS.iter().find(|(word, _)| *word == keys[i]) {
            Some((_, replacement)) => out.push(*replacement),
            None => out.push(tokens[i]),
        }
        i += 1;
    }
    out.join(" ")
}
