//! Engine backed by an external synthesizer process such as `espeak-ng`.

use crate::engine::{SpeechEngine, SpeechError, Utterance, UtteranceEvent, UtteranceEvents};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// espeak's default speed in words per minute.
const BASE_WPM: f64 = 175.0;

/// [`SpeechEngine`] that runs one synthesizer process per utterance.
///
/// The text is written to the child's stdin. Cancelling kills the process.
/// Rate, pitch and volume are mapped onto espeak-style `-s`, `-p` and `-a`
/// flags.
pub struct CommandEngine {
    program: String,
    extra_args: Vec<String>,
    active: Mutex<Option<JoinHandle<()>>>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            active: Mutex::new(None),
        }
    }

    /// Use `espeak-ng` from `PATH`.
    pub fn espeak() -> Self {
        Self::new("espeak-ng")
    }

    /// Arguments placed before the voice flags.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Voice flags for `utterance`.
    pub fn voice_args(utterance: &Utterance) -> Vec<String> {
        let wpm = (BASE_WPM * utterance.rate).round().clamp(80.0, 500.0);
        let pitch = (utterance.pitch * 50.0).round().clamp(0.0, 99.0);
        let amplitude = (utterance.volume * 100.0).round().clamp(0.0, 200.0);
        vec![
            "-s".into(),
            format!("{wpm}"),
            "-p".into(),
            format!("{pitch}"),
            "-a".into(),
            format!("{amplitude}"),
            "--stdin".into(),
        ]
    }

    fn replace(&self, next: Option<JoinHandle<()>>) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *active, next) {
            previous.abort();
        }
    }
}

#[async_trait]
impl SpeechEngine for CommandEngine {
    async fn submit(&self, utterance: Utterance) -> crate::Result<UtteranceEvents> {
        self.replace(None);
        info!(program = %self.program, "launching synthesizer");
        let mut child = Command::new(&self.program)
            .args(&self.extra_args)
            .args(Self::voice_args(&utterance))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SpeechError::Engine("synthesizer stdin unavailable".into()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let text = utterance.text;
        let task = tokio::spawn(async move {
            let _ = tx.send(UtteranceEvent::Started);
            let fed = async {
                stdin.write_all(text.as_bytes()).await?;
                stdin.shutdown().await
            }
            .await;
            drop(stdin);
            if let Err(e) = fed {
                let _ = tx.send(UtteranceEvent::Failed(e.to_string()));
                return;
            }
            let event = match child.wait().await {
                Ok(status) if status.success() => UtteranceEvent::Ended,
                Ok(status) => UtteranceEvent::Failed(format!("synthesizer exited with {status}")),
                Err(e) => UtteranceEvent::Failed(e.to_string()),
            };
            debug!(?event, "synthesizer finished");
            let _ = tx.send(event);
        });
        self.replace(Some(task));
        Ok(rx)
    }

    async fn cancel(&self) {
        self.replace(None);
    }
}

impl Drop for CommandEngine {
    fn drop(&mut self) {
        self.replace(None);
    }
}
