use crate::engine::{SpeechEngine, Utterance, UtteranceEvent, UtteranceEvents, VoiceSettings};
use async_trait::async_trait;
use mouth::{Mouth, MouthDriver, Profile};
use prosody::{Analyzer, WordTiming};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// [`Mouth`] implementation that speaks through a [`SpeechEngine`] and
/// animates a [`MouthDriver`] while the engine reports it is talking.
///
/// The driver starts on the engine's `Started` event and stops on `Ended`
/// or `Failed`. Its schedule is an estimate and may drift from the audio.
///
/// Overlapping calls to `speak` are handled one at a time, so the listener
/// installed last always belongs to the utterance the engine is saying.
pub struct TtsMouth {
    engine: Arc<dyn SpeechEngine>,
    driver: Arc<MouthDriver>,
    analyzer: Analyzer,
    voice: VoiceSettings,
    listener: Mutex<Option<JoinHandle<()>>>,
    turn: tokio::sync::Mutex<()>,
    /// Bumped by every `interrupt`.
    interrupts: AtomicU64,
}

impl TtsMouth {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        driver: Arc<MouthDriver>,
        analyzer: Analyzer,
        voice: VoiceSettings,
    ) -> Self {
        Self {
            engine,
            driver,
            analyzer,
            voice,
            listener: Mutex::new(None),
            turn: tokio::sync::Mutex::new(()),
            interrupts: AtomicU64::new(0),
        }
    }

    /// Build a mouth with a fresh driver configured from `profile`.
    pub fn with_profile(
        engine: Arc<dyn SpeechEngine>,
        profile: Profile,
        voice: VoiceSettings,
    ) -> Self {
        Self::new(
            engine,
            Arc::new(MouthDriver::new(profile.granularity)),
            profile.analyzer(),
            voice,
        )
    }

    pub fn driver(&self) -> &Arc<MouthDriver> {
        &self.driver
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    fn replace_listener(&self, next: Option<JoinHandle<()>>) {
        let mut listener = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *listener, next) {
            previous.abort();
        }
    }

    /// Install `task` unless an interrupt arrived after `seen` was read.
    fn install_listener(&self, seen: u64, task: JoinHandle<()>) -> bool {
        let mut listener = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        if self.interrupts.load(Ordering::SeqCst) != seen {
            task.abort();
            return false;
        }
        if let Some(previous) = listener.replace(task) {
            previous.abort();
        }
        true
    }

    async fn halt(&self) {
        self.engine.cancel().await;
        self.replace_listener(None);
        self.driver.stop();
    }
}

#[async_trait]
impl Mouth for TtsMouth {
    async fn speak(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let _turn = self.turn.lock().await;
        self.halt().await;
        let seen = self.interrupts.load(Ordering::SeqCst);
        let timings = self.analyzer.analyze(text, self.voice.rate);
        debug!(words = timings.len(), "speaking");
        match self.engine.submit(Utterance::new(text, &self.voice)).await {
            Ok(events) => {
                let task = tokio::spawn(follow(events, self.driver.clone(), timings));
                if !self.install_listener(seen, task) {
                    debug!("interrupted while submitting");
                    self.engine.cancel().await;
                    self.driver.stop();
                }
            }
            Err(e) => {
                warn!(error = %e, "speech engine rejected utterance");
                self.driver.stop();
            }
        }
    }

    async fn interrupt(&self) {
        self.interrupts.fetch_add(1, Ordering::SeqCst);
        self.halt().await;
    }

    fn speaking(&self) -> bool {
        self.driver.is_animating()
    }
}

impl Drop for TtsMouth {
    fn drop(&mut self) {
        self.replace_listener(None);
    }
}

async fn follow(mut events: UtteranceEvents, driver: Arc<MouthDriver>, timings: Vec<WordTiming>) {
    let mut timings = Some(timings);
    while let Some(event) = events.recv().await {
        match event {
            UtteranceEvent::Started => {
                if let Some(seq) = timings.take() {
                    driver.start(seq);
                }
            }
            UtteranceEvent::Ended => {
                driver.stop();
                return;
            }
            UtteranceEvent::Failed(reason) => {
                warn!(%reason, "utterance failed");
                driver.stop();
                return;
            }
        }
    }
}
