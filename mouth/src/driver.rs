//! Timer driven mouth state machine.
//!
//! A [`MouthDriver`] is either idle or animating at some word (and syllable)
//! of a timing sequence. Each run owns a single pending step task; starting a
//! new run or stopping aborts it and bumps the run epoch, so a step belonging
//! to a superseded run can never publish.

use crate::state::MouthState;
use prosody::WordTiming;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// How finely the driver steps through a word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// One step per word, lasting the word's full duration.
    PerWord,
    /// One step per syllable, splitting the word's duration evenly.
    #[default]
    PerSyllable,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cursor {
    word: usize,
    syllable: u32,
}

impl Cursor {
    fn steps_in(granularity: Granularity, timing: &WordTiming) -> u32 {
        match granularity {
            Granularity::PerWord => 1,
            Granularity::PerSyllable => timing.steps(),
        }
    }

    fn next(self, granularity: Granularity, seq: &[WordTiming]) -> Option<Cursor> {
        if self.syllable + 1 < Self::steps_in(granularity, &seq[self.word]) {
            Some(Cursor {
                word: self.word,
                syllable: self.syllable + 1,
            })
        } else if self.word + 1 < seq.len() {
            Some(Cursor {
                word: self.word + 1,
                syllable: 0,
            })
        } else {
            None
        }
    }

    fn delay(self, granularity: Granularity, seq: &[WordTiming]) -> Duration {
        let timing = &seq[self.word];
        let ms = match granularity {
            Granularity::PerWord => timing.duration_ms,
            Granularity::PerSyllable => timing.step_ms(),
        };
        Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }

    fn snapshot(self, granularity: Granularity, seq: &[WordTiming]) -> MouthState {
        let timing = &seq[self.word];
        MouthState {
            is_animating: true,
            intensity: timing.intensity(),
            current_word: timing.word.clone(),
            current_syllable: match granularity {
                Granularity::PerWord => 0,
                Granularity::PerSyllable => self.syllable + 1,
            },
        }
    }
}

struct Run {
    epoch: u64,
    pending: Option<JoinHandle<()>>,
    state: MouthState,
}

impl Run {
    fn cancel(&mut self) {
        if let Some(step) = self.pending.take() {
            step.abort();
        }
        self.epoch = self.epoch.wrapping_add(1);
    }
}

struct Shared {
    run: Mutex<Run>,
    events: broadcast::Sender<MouthState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Run> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, run: &mut Run, state: MouthState) {
        run.state = state.clone();
        let _ = self.events.send(state);
    }
}

/// Animates the mouth in step with estimated word timings.
///
/// Dropping the driver cancels any pending step.
pub struct MouthDriver {
    granularity: Granularity,
    shared: Arc<Shared>,
}

impl MouthDriver {
    /// Broadcast capacity for state snapshots.
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(granularity: Granularity) -> Self {
        let (events, _) = broadcast::channel(Self::DEFAULT_CAPACITY);
        Self {
            granularity,
            shared: Arc::new(Shared {
                run: Mutex::new(Run {
                    epoch: 0,
                    pending: None,
                    state: MouthState::idle(),
                }),
                events,
            }),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Begin animating `sequence`, replacing any run in progress.
    ///
    /// An empty sequence behaves like [`MouthDriver::stop`]. Must be called
    /// from within a Tokio runtime.
    pub fn start(&self, sequence: Vec<WordTiming>) {
        if sequence.is_empty() {
            self.stop();
            return;
        }
        let sequence: Arc<[WordTiming]> = sequence.into();
        let cursor = Cursor::default();
        let mut run = self.shared.lock();
        run.cancel();
        let epoch = run.epoch;
        debug!(
            words = sequence.len(),
            granularity = ?self.granularity,
            "mouth animation started"
        );
        self.shared
            .publish(&mut run, cursor.snapshot(self.granularity, &sequence));
        run.pending = Some(tokio::spawn(step_through(
            self.shared.clone(),
            self.granularity,
            sequence,
            epoch,
            cursor,
        )));
    }

    /// Cancel the pending step, if any, and publish the idle state.
    pub fn stop(&self) {
        let mut run = self.shared.lock();
        run.cancel();
        self.shared.publish(&mut run, MouthState::idle());
        debug!("mouth animation stopped");
    }

    /// Latest published snapshot.
    pub fn state(&self) -> MouthState {
        self.shared.lock().state.clone()
    }

    pub fn is_animating(&self) -> bool {
        self.shared.lock().state.is_animating
    }

    /// Whether a step is currently scheduled.
    pub fn has_pending_step(&self) -> bool {
        self.shared
            .lock()
            .pending
            .as_ref()
            .is_some_and(|step| !step.is_finished())
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MouthState> {
        self.shared.events.subscribe()
    }
}

impl Default for MouthDriver {
    fn default() -> Self {
        Self::new(Granularity::default())
    }
}

impl Drop for MouthDriver {
    fn drop(&mut self) {
        self.shared.lock().cancel();
    }
}

async fn step_through(
    shared: Arc<Shared>,
    granularity: Granularity,
    sequence: Arc<[WordTiming]>,
    epoch: u64,
    mut cursor: Cursor,
) {
    loop {
        tokio::time::sleep(cursor.delay(granularity, &sequence)).await;
        let mut run = shared.lock();
        if run.epoch != epoch {
            return;
        }
        match cursor.next(granularity, &sequence) {
            Some(next) => {
                cursor = next;
                trace!(word = cursor.word, syllable = cursor.syllable, "mouth step");
                shared.publish(&mut run, cursor.snapshot(granularity, &sequence));
            }
            None => {
                run.pending = None;
                run.epoch = run.epoch.wrapping_add(1);
                shared.publish(&mut run, MouthState::idle());
                debug!("mouth animation finished");
                return;
            }
        }
    }
}
