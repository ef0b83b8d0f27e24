//! Letter level helpers used to score words.

use serde::{Deserialize, Serialize};

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// How a word's complexity score is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Count of consonant letters.
    Consonants,
    /// Count of vowel groups, `y` included.
    #[default]
    Syllables,
}

impl Strategy {
    /// Score at which mouth intensity saturates.
    pub fn normalization(self) -> f32 {
        match self {
            Strategy::Consonants => 4.0,
            Strategy::Syllables => 3.0,
        }
    }

    /// Pause inserted after every word, in milliseconds.
    pub fn gap_ms(self) -> f64 {
        match self {
            Strategy::Consonants => 50.0,
            Strategy::Syllables => 30.0,
        }
    }

    /// Complexity score of `word`.
    pub fn score(self, word: &str) -> u32 {
        match self {
            Strategy::Consonants => count_consonants(word),
            Strategy::Syllables => count_syllables(word),
        }
    }

    /// Spoken duration of `word` at rate 1.0, in milliseconds.
    pub(crate) fn base_duration_ms(self, word: &str, score: u32) -> f64 {
        match self {
            Strategy::Consonants => {
                let others = count_letters(word).saturating_sub(score);
                200.0 + f64::from(score) * 60.0 + f64::from(others) * 24.0
            }
            Strategy::Syllables => 150.0 + f64::from(score) * 80.0,
        }
    }
}

fn letters(word: &str) -> impl Iterator<Item = char> + '_ {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
}

fn count_letters(word: &str) -> u32 {
    letters(word).count() as u32
}

/// Number of letters in `word` that are not `a e i o u`.
///
/// Punctuation, digits and other non-letters never count.
pub fn count_consonants(word: &str) -> u32 {
    letters(word).filter(|c| !VOWELS.contains(c)).count() as u32
}

/// Number of vowel groups in `word`, treating `y` as a vowel.
///
/// Returns at least 1 for any word containing a letter and 0 otherwise.
pub fn count_syllables(word: &str) -> u32 {
    let mut groups = 0;
    let mut in_group = false;
    let mut any = false;
    for c in letters(word) {
        any = true;
        let vowel = VOWELS.contains(&c) || c == 'y';
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }
    if any { groups.max(1) } else { 0 }
}

/// Mouth intensity for `score` under `strategy`, clamped to `[0, 1]`.
pub fn intensity_of(score: u32, strategy: Strategy) -> f32 {
    (score as f32 / strategy.normalization()).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consonants_skip_vowels_and_punctuation() {
        assert_eq!(count_consonants("hello"), 3);
        assert_eq!(count_consonants("World!"), 4);
        assert_eq!(count_consonants("a-e-i"), 0);
        assert_eq!(count_consonants("42"), 0);
    }

    #[test]
    fn syllables_count_vowel_groups() {
        assert_eq!(count_syllables("hello"), 2);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("queue"), 1);
        assert_eq!(count_syllables("happy"), 2);
    }

    #[test]
    fn syllables_floor_at_one() {
        assert_eq!(count_syllables("rhythm"), 1);
        assert_eq!(count_syllables("hmm"), 1);
        assert_eq!(count_syllables("..."), 0);
        assert_eq!(count_syllables(""), 0);
    }

    #[test]
    fn intensity_saturates() {
        assert_eq!(intensity_of(0, Strategy::Consonants), 0.0);
        assert_eq!(intensity_of(2, Strategy::Consonants), 0.5);
        assert_eq!(intensity_of(40, Strategy::Consonants), 1.0);
        assert_eq!(intensity_of(30, Strategy::Syllables), 1.0);
    }
}
