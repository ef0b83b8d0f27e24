//! The robot session: what the controls talk to.

use llm::{LLMClient, LLMError};
use mouth::{Mouth, MouthDriver, MouthState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

/// Spoken when a question cannot be answered.
pub const APOLOGY: &str = "Sorry, I couldn't process your question. Please try again.";

/// What the submit button does with the typed text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Say the text verbatim.
    #[default]
    Speak,
    /// Ask the language model and say its answer.
    Ask,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Speak => "Say it",
            Mode::Ask => "Ask",
        }
    }
}

/// Speech, questions and face state for one robot.
pub struct Robot {
    mouth: Arc<dyn Mouth>,
    driver: Arc<MouthDriver>,
    llm: Arc<dyn LLMClient>,
    loading: watch::Sender<bool>,
    /// Bumped by every `stop`.
    stops: AtomicU64,
}

impl Robot {
    /// `driver` must be the driver animated by `mouth`.
    pub fn new(mouth: Arc<dyn Mouth>, driver: Arc<MouthDriver>, llm: Arc<dyn LLMClient>) -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            mouth,
            driver,
            llm,
            loading,
            stops: AtomicU64::new(0),
        }
    }

    /// Say `text` out loud. Blank text does nothing.
    pub async fn speak(&self, text: &str) {
        self.mouth.speak(text).await;
    }

    /// Ask the language model and say its answer.
    ///
    /// While waiting the robot is "thinking". Any failure is answered with
    /// [`APOLOGY`] instead. Blank questions, questions asked while another
    /// is pending, and answers arriving after [`Robot::stop`] are dropped.
    pub async fn ask(&self, question: &str) {
        if question.trim().is_empty() {
            return;
        }
        let claimed = self
            .loading
            .send_if_modified(|busy| !std::mem::replace(busy, true));
        if !claimed {
            debug!("still thinking; question ignored");
            return;
        }
        let stops = self.stops.load(Ordering::SeqCst);
        let answer = self.llm.ask(question).await;
        self.loading.send_replace(false);
        if self.stops.load(Ordering::SeqCst) != stops {
            debug!("stopped while thinking; answer dropped");
            return;
        }
        match answer {
            Ok(reply) => {
                debug!(chars = reply.len(), "answer received");
                self.speak(&reply).await;
            }
            Err(LLMError::EmptyInput) => {}
            Err(e) => {
                warn!(error = %e, "question failed");
                self.speak(APOLOGY).await;
            }
        }
    }

    pub async fn submit(&self, mode: Mode, text: &str) {
        match mode {
            Mode::Speak => self.speak(text).await,
            Mode::Ask => self.ask(text).await,
        }
    }

    /// Stop talking and close the mouth.
    pub async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.mouth.interrupt().await;
    }

    pub fn state(&self) -> MouthState {
        self.driver.state()
    }

    pub fn speaking(&self) -> bool {
        self.mouth.speaking()
    }

    /// Whether a question is waiting on the language model.
    pub fn loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MouthState> {
        self.driver.subscribe()
    }

    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Text for the submit button.
    pub fn status_label(&self, mode: Mode) -> &'static str {
        if self.loading() {
            "Thinking..."
        } else if self.speaking() {
            "Speaking..."
        } else {
            mode.label()
        }
    }
}
