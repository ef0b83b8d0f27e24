//! Silent engine that pretends to speak for the estimated duration.

use crate::engine::{SpeechEngine, Utterance, UtteranceEvent, UtteranceEvents};
use async_trait::async_trait;
use prosody::Analyzer;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// [`SpeechEngine`] that produces no audio.
///
/// Each utterance starts after `start_delay` and ends once the analyzer's
/// estimate for the text has elapsed. Useful on machines without a
/// synthesizer and for demos of the face alone.
pub struct SimulatedEngine {
    analyzer: Analyzer,
    start_delay: Duration,
    active: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedEngine {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            start_delay: Duration::ZERO,
            active: Mutex::new(None),
        }
    }

    /// Delay between submission and the `Started` event.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    fn replace(&self, next: Option<JoinHandle<()>>) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *active, next) {
            previous.abort();
        }
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new(Analyzer::default())
    }
}

#[async_trait]
impl SpeechEngine for SimulatedEngine {
    async fn submit(&self, utterance: Utterance) -> crate::Result<UtteranceEvents> {
        let (tx, rx) = mpsc::unbounded_channel();
        let talk = Duration::from_secs_f64(
            self.analyzer.total_ms(&utterance.text, utterance.rate) / 1000.0,
        );
        let start_delay = self.start_delay;
        debug!(?talk, "simulating utterance");
        let task = tokio::spawn(async move {
            tokio::time::sleep(start_delay).await;
            if tx.send(UtteranceEvent::Started).is_err() {
                return;
            }
            tokio::time::sleep(talk).await;
            let _ = tx.send(UtteranceEvent::Ended);
        });
        self.replace(Some(task));
        Ok(rx)
    }

    async fn cancel(&self) {
        self.replace(None);
    }
}

impl Drop for SimulatedEngine {
    fn drop(&mut self) {
        self.replace(None);
    }
}
