//! Word timing estimation for mouth animation.
//!
//! The [`Analyzer`] turns a piece of text into a sequence of [`WordTiming`]s:
//! one record per whitespace separated word carrying a complexity score, the
//! estimated spoken duration and its offset inside the utterance. Scores are
//! either consonant counts or syllable counts depending on the [`Strategy`].
//!
//! ```
//! use prosody::{Analyzer, Strategy};
//!
//! let timings = Analyzer::new(Strategy::Syllables).analyze("hello world", 0.8);
//! assert_eq!(timings.len(), 2);
//! assert_eq!(timings[0].start_ms, 0.0);
//! ```

pub mod text;
pub mod timing;

pub use crate::text::*;
pub use crate::timing::*;
