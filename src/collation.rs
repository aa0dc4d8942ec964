//! Case-insensitive title ordering that follows the Ukrainian alphabet.
//!
//! Plain code-point order puts `є`, `і`, `ї` and `ґ` after `я` and every
//! accented Latin letter after `z`. Here every character is case-folded,
//! Cyrillic letters are weighted by their position in the alphabet and other
//! letters are compared by their base form, so `Éclair` sorts next to
//! `Eclair`. Latin titles still sort before Cyrillic ones.

use std::cmp::Ordering;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

const CYRILLIC_ORDER: &[char] = &[
    'а', 'б', 'в', 'г', 'ґ', 'д', 'е', 'є', 'ё', 'ж', 'з', 'и', 'і', 'ї', 'й', 'к', 'л', 'м', 'н',
    'о', 'п', 'р', 'с', 'т', 'у', 'ф', 'х', 'ц', 'ч', 'ш', 'щ', 'ъ', 'ы', 'ь', 'э', 'ю', 'я',
];

/// Lowest code point of the basic lowercase Cyrillic block (`а`).
const CYRILLIC_BASE: u32 = 0x0430;

fn alphabet_position(c: char) -> Option<u32> {
    CYRILLIC_ORDER
        .iter()
        .position(|&letter| letter == c)
        .map(|index| index as u32)
}

fn weight(c: char) -> u32 {
    match alphabet_position(c) {
        // Fits between U+042F and U+0431 once everything is scaled by 256.
        Some(index) => CYRILLIC_BASE * 256 + index,
        None => (c as u32) * 256,
    }
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Weights with diacritics stripped. Letters of the alphabet table are kept
/// whole: `й` and `ї` are letters of their own, not accented `и` and `і`.
fn base_weights(s: &str) -> Vec<u32> {
    let mut weights = Vec::with_capacity(s.len());
    for c in folded(s) {
        if alphabet_position(c).is_some() {
            weights.push(weight(c));
            continue;
        }
        decompose_canonical(c, |part| {
            if !is_combining_mark(part) {
                weights.push(weight(part));
            }
        });
    }
    weights
}

fn accented_weights(s: &str) -> impl Iterator<Item = u32> + '_ {
    folded(s).map(weight)
}

/// Total order over titles: base letters first, then accents, then the raw
/// string as the tie-breaker.
#[must_use]
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    base_weights(a)
        .cmp(&base_weights(b))
        .then_with(|| accented_weights(a).cmp(accented_weights(b)))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(titles: &[&str]) -> Vec<String> {
        let mut titles: Vec<String> = titles.iter().map(ToString::to_string).collect();
        titles.sort_by(|a, b| compare_titles(a, b));
        titles
    }

    #[test]
    fn test_ignores_case() {
        assert_eq!(
            sorted(&["banana", "Apple", "cherry", "apricot"]),
            vec!["Apple", "apricot", "banana", "cherry"]
        );
    }

    #[test]
    fn test_ukrainian_letters_follow_the_alphabet() {
        assert_eq!(
            sorted(&["Яблуко", "Їжак", "Іграшка", "Гора", "Ґанок", "Єнот", "Ехо", "Кіт"]),
            vec!["Гора", "Ґанок", "Ехо", "Єнот", "Іграшка", "Їжак", "Кіт", "Яблуко"]
        );
    }

    #[test]
    fn test_ukrainian_letters_with_marks_stay_distinct() {
        assert_eq!(
            sorted(&["Йога", "Кит", "Ищук", "Їжа", "Іній"]),
            vec!["Ищук", "Іній", "Їжа", "Йога", "Кит"]
        );
    }

    #[test]
    fn test_latin_accents_sort_with_their_base_letter() {
        assert_eq!(
            sorted(&["Zorro", "Éclair", "Amélie", "Amen"]),
            vec!["Amélie", "Amen", "Éclair", "Zorro"]
        );
        assert_eq!(
            sorted(&["Léon", "Leopard", "lemon", "Ça ira"]),
            vec!["Ça ira", "lemon", "Léon", "Leopard"]
        );
    }

    #[test]
    fn test_unaccented_title_sorts_before_accented_twin() {
        assert_eq!(compare_titles("Eclair", "Éclair"), Ordering::Less);
        assert_eq!(compare_titles("éclair", "Eclair"), Ordering::Greater);
    }

    #[test]
    fn test_latin_sorts_before_cyrillic() {
        assert_eq!(sorted(&["Агент", "Zorro", "alien"]), vec!["alien", "Zorro", "Агент"]);
    }

    #[test]
    fn test_digits_sort_before_letters() {
        assert_eq!(sorted(&["Se7en", "2001", "12 Angry Men"]), vec!["12 Angry Men", "2001", "Se7en"]);
    }

    #[test]
    fn test_ties_are_broken_deterministically() {
        assert_eq!(compare_titles("matrix", "Matrix"), "matrix".cmp("Matrix"));
        assert_ne!(compare_titles("matrix", "Matrix"), Ordering::Equal);
        assert_eq!(compare_titles("Heat", "Heat"), Ordering::Equal);
    }
}
