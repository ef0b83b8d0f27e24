//! Per-word timing records.

use crate::text::{Strategy, count_syllables, intensity_of};
use serde::{Deserialize, Serialize};

/// Slowest speech rate accepted by speech engines.
pub const MIN_RATE: f64 = 0.1;
/// Fastest speech rate accepted by speech engines.
pub const MAX_RATE: f64 = 10.0;

/// Clamp `rate` into `[MIN_RATE, MAX_RATE]`, mapping non-finite values to 1.0.
pub fn normalize_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(MIN_RATE, MAX_RATE)
    } else {
        1.0
    }
}

/// Estimated timing of a single spoken word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    /// Lowercased word as it appeared in the text.
    pub word: String,
    /// Complexity score under [`WordTiming::strategy`].
    pub score: u32,
    /// Number of syllables, independent of the scoring strategy.
    pub syllables: u32,
    pub strategy: Strategy,
    pub duration_ms: f64,
    pub start_ms: f64,
    pub end_ms: f64,
}

impl WordTiming {
    /// How wide the mouth opens for this word, in `[0, 1]`.
    pub fn intensity(&self) -> f32 {
        intensity_of(self.score, self.strategy)
    }

    /// Number of syllable steps the word is split into; never zero.
    pub fn steps(&self) -> u32 {
        self.syllables.max(1)
    }

    /// Length of one syllable step in milliseconds.
    pub fn step_ms(&self) -> f64 {
        self.duration_ms / f64::from(self.steps())
    }
}

/// Converts text into [`WordTiming`] sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Analyzer {
    strategy: Strategy,
}

impl Analyzer {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Estimated spoken duration of a single word at `rate`.
    pub fn word_duration_ms(&self, word: &str, rate: f64) -> f64 {
        let score = self.strategy.score(word);
        self.strategy.base_duration_ms(word, score) / normalize_rate(rate)
    }

    /// Split `text` into words and estimate when each one is spoken.
    ///
    /// Words are separated by runs of whitespace. Each word starts
    /// [`Strategy::gap_ms`] after the previous one ends. Blank text yields an
    /// empty sequence.
    pub fn analyze(&self, text: &str, rate: f64) -> Vec<WordTiming> {
        let rate = normalize_rate(rate);
        let gap = self.strategy.gap_ms();
        let lowered = text.to_lowercase();
        let mut cursor = 0.0;
        let mut out = Vec::new();
        for word in lowered.split_whitespace() {
            let score = self.strategy.score(word);
            let duration_ms = self.strategy.base_duration_ms(word, score) / rate;
            let end_ms = cursor + duration_ms;
            out.push(WordTiming {
                word: word.to_string(),
                score,
                syllables: count_syllables(word),
                strategy: self.strategy,
                duration_ms,
                start_ms: cursor,
                end_ms,
            });
            cursor = end_ms + gap;
        }
        out
    }

    /// Total time from the first word's start to the last word's end.
    pub fn total_ms(&self, text: &str, rate: f64) -> f64 {
        self.analyze(text, rate)
            .last()
            .map(|w| w.end_ms)
            .unwrap_or_default()
    }
}
