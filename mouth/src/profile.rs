use crate::driver::Granularity;
use prosody::{Analyzer, Strategy};
use serde::{Deserialize, Serialize};

/// Pairing of word scoring and animation stepping.
///
/// ```
/// use mouth::{Granularity, Profile};
/// use prosody::Strategy;
///
/// let profile = Profile::default();
/// assert_eq!(profile.strategy, Strategy::Syllables);
/// assert_eq!(profile.granularity, Granularity::PerSyllable);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub strategy: Strategy,
    pub granularity: Granularity,
}

impl Profile {
    /// Consonant density per word; one mouth step per word.
    pub fn consonant() -> Self {
        Self {
            strategy: Strategy::Consonants,
            granularity: Granularity::PerWord,
        }
    }

    /// Syllable counts; one mouth step per syllable.
    pub fn syllable() -> Self {
        Self {
            strategy: Strategy::Syllables,
            granularity: Granularity::PerSyllable,
        }
    }

    pub fn analyzer(&self) -> Analyzer {
        Analyzer::new(self.strategy)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::syllable()
    }
}
