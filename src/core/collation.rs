//! Turkish collation for table sorting.
//!
//! Letters follow the Turkish alphabet (`c < ç < d`, `h < ı < i`, `s < ş < t`),
//! case is ignored using Turkish case mapping (`I`/`ı`, `İ`/`i`), and accents
//! that are not Turkish letters (`â`, `î`, `û`, ...) only break ties between
//! otherwise equal strings. Spaces and punctuation sort before digits, digits
//! before letters.

use std::cmp::Ordering;

const ALPHABET: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Ignorable,
    Digit,
    Letter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Weight {
    class: Class,
    primary: u32,
}

fn turkish_lowercase(c: char) -> char {
    match c {
        'I' => 'ı',
        'İ' => 'i',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Strips accents that are not letters of their own in Turkish.
/// Returns the base letter and whether an accent was removed.
fn fold_accent(c: char) -> (char, bool) {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' => 'o',
        'ù' | 'ú' | 'û' => 'u',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        _ => return (c, false),
    };
    (base, true)
}

fn weigh(c: char) -> (Weight, bool) {
    let (c, accented) = fold_accent(turkish_lowercase(c));
    let weight = if let Some(index) = ALPHABET.chars().position(|a| a == c) {
        Weight {
            class: Class::Letter,
            primary: index as u32,
        }
    } else if let Some(digit) = c.to_digit(10) {
        Weight {
            class: Class::Digit,
            primary: digit,
        }
    } else if c.is_alphanumeric() {
        Weight {
            class: Class::Other,
            primary: c as u32,
        }
    } else {
        Weight {
            class: Class::Ignorable,
            primary: c as u32,
        }
    };
    (weight, accented)
}

/// Compares two strings under Turkish collation, ignoring case.
pub fn compare(a: &str, b: &str) -> Ordering {
    let (primary_a, accents_a): (Vec<Weight>, Vec<bool>) = a.chars().map(weigh).unzip();
    let (primary_b, accents_b): (Vec<Weight>, Vec<bool>) = b.chars().map(weigh).unzip();

    primary_a
        .cmp(&primary_b)
        .then_with(|| accents_a.cmp(&accents_b))
}
