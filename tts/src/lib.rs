//! Speak text through a speech engine while animating the mouth.
//!
//! [`SpeechEngine`] abstracts the device synthesizer: it accepts an
//! [`Utterance`] and reports its lifecycle as [`UtteranceEvent`]s. [`TtsMouth`]
//! ties those events to a [`mouth::MouthDriver`] so the face moves while the
//! engine talks.

pub mod command;
pub mod engine;
pub mod simulated;
pub mod tts_mouth;

pub use command::CommandEngine;
pub use engine::{
    SpeechEngine, SpeechError, Utterance, UtteranceEvent, UtteranceEvents, VoiceSettings,
};
pub use simulated::SimulatedEngine;
pub use tts_mouth::TtsMouth;

/// Convenience result type used throughout this crate.
pub type Result<T> = std::result::Result<T, SpeechError>;
