use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),
    #[error("failed to launch synthesizer: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("speech engine error: {0}")]
    Engine(String),
}

/// Voice parameters applied to every utterance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Speaking rate; 1.0 is the engine's normal speed.
    pub rate: f64,
    /// Pitch in `[0, 2]`; 1.0 is the engine's normal pitch.
    pub pitch: f64,
    /// Volume in `[0, 1]`.
    pub volume: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.8,
            pitch: 0.5,
            volume: 0.8,
        }
    }
}

/// One request to vocalize a piece of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
}

impl Utterance {
    pub fn new(text: impl Into<String>, voice: &VoiceSettings) -> Self {
        Self {
            text: text.into(),
            rate: voice.rate,
            pitch: voice.pitch,
            volume: voice.volume,
        }
    }
}

/// Lifecycle notifications for a submitted [`Utterance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UtteranceEvent {
    Started,
    Ended,
    Failed(String),
}

/// Receiving end of an utterance's lifecycle events.
///
/// The channel closes without further events once the utterance is cancelled.
pub type UtteranceEvents = mpsc::UnboundedReceiver<UtteranceEvent>;

/// A speech synthesizer that speaks one utterance at a time.
///
/// Submitting replaces whatever the engine was saying. Events arrive when the
/// engine decides; `Ended` or `Failed` never precede `Started`.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Begin speaking `utterance` and return its lifecycle events.
    async fn submit(&self, utterance: Utterance) -> crate::Result<UtteranceEvents>;
    /// Abort the active utterance and suppress its remaining events.
    async fn cancel(&self);
}
