//! American Soundex

use super::{PhoneticCode, PhoneticEncoder};

const CODE_LEN: usize = 4;

/// First letter plus three digits for the following consonant groups.
///
/// Only ASCII letters take part; everything else is skipped, so a
/// multi-word name is coded as one run of letters. Vowels and `Y` separate
/// equal digits, `H` and `W` do not.
#[derive(Debug, Clone, Copy, Default)]
pub struct Soundex;

impl PhoneticEncoder for Soundex {
    fn name(&self) -> &'static str {
        "soundex"
    }

    fn encode(&self, token: &str) -> PhoneticCode {
        PhoneticCode::new(soundex(token))
    }
}

fn digit(c: char) -> Option<char> {
    match c {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

pub fn soundex(token: &str) -> String {
    let mut letters = token
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase());

    let Some(first) = letters.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(CODE_LEN);
    code.push(first);
    let mut last = digit(first);

    for c in letters {
        if code.len() == CODE_LEN {
            break;
        }
        if c == 'H' || c == 'W' {
            continue;
        }
        let d = digit(c);
        if let Some(d) = d {
            if last != Some(d) {
                code.push(d);
            }
        }
        last = d;
    }

    while code.len() < CODE_LEN {
        code.push('0');
    }
    code
}
