//! Double Metaphone (primary code)
//!
//! Native builds with the `phonetic` feature use `rphonetic`. Other builds
//! fall back to [`Metaphone`](super::Metaphone) so the encoder is always
//! available, with coarser codes.

use super::{PhoneticCode, PhoneticEncoder};

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleMetaphone;

impl PhoneticEncoder for DoubleMetaphone {
    fn name(&self) -> &'static str {
        "double_metaphone"
    }

    fn encode(&self, token: &str) -> PhoneticCode {
        PhoneticCode::new(double_metaphone(token))
    }
}

/// Letters only; the encoder works reliably on ASCII alone
fn ascii_letters(token: &str) -> String {
    token.chars().filter(char::is_ascii_alphabetic).collect()
}

#[cfg(all(not(target_arch = "wasm32"), feature = "phonetic"))]
pub fn double_metaphone(token: &str) -> String {
    let letters = ascii_letters(token);
    if letters.is_empty() {
        return String::new();
    }
    rphonetic::DoubleMetaphone::default()
        .double_metaphone(&letters)
        .primary()
}

#[cfg(any(target_arch = "wasm32", not(feature = "phonetic")))]
pub fn double_metaphone(token: &str) -> String {
    super::metaphone::metaphone(&ascii_letters(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(double_metaphone(""), "");
        assert_eq!(double_metaphone("1234"), "");
    }

    #[test]
    fn test_homophones() {
        for (a, b) in [("smith", "smyth"), ("knight", "night"), ("phone", "fone")] {
            assert_eq!(double_metaphone(a), double_metaphone(b), "{a} / {b}");
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(double_metaphone("schmidt"), double_metaphone("schmidt"));
        assert!(!double_metaphone("schmidt").is_empty());
    }
}
