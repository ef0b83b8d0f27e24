//! Command line and environment configuration.
//!
//! Every option can also come from the environment; a `.env` file in the
//! working directory is loaded first by the binary.

use crate::robot::Robot;
use clap::{Parser, ValueEnum};
use llm::{ChatConfig, OpenAIClient};
use mouth::Profile;
use std::sync::Arc;
use std::time::Duration;
use tts::{CommandEngine, SimulatedEngine, SpeechEngine, TtsMouth, VoiceSettings};

/// Which speech engine voices the robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// No audio; lifecycle events follow the timing estimate.
    Simulated,
    /// Run an espeak compatible program.
    Espeak,
}

/// Mouth timing heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProfileKind {
    /// Consonant density, one mouth step per word.
    Consonant,
    /// Syllable counts, one mouth step per syllable.
    Syllable,
}

impl From<ProfileKind> for Profile {
    fn from(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Consonant => Profile::consonant(),
            ProfileKind::Syllable => Profile::syllable(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Talking robot face")]
pub struct Config {
    /// Address to bind the HTTP server
    #[arg(long, env = "FACE_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: String,

    /// Chat-completion endpoint
    #[arg(
        long,
        env = "OPENAI_API_URL",
        default_value = llm::config::DEFAULT_ENDPOINT
    )]
    pub api_url: String,

    /// Bearer credential for the chat endpoint
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Chat model name
    #[arg(long, env = "OPENAI_MODEL", default_value = llm::config::DEFAULT_MODEL)]
    pub model: String,

    /// Give up on a question after this many seconds
    #[arg(long, env = "OPENAI_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Speech engine
    #[arg(long, env = "FACE_ENGINE", value_enum, default_value = "simulated")]
    pub engine: EngineKind,

    /// Synthesizer program used by the espeak engine
    #[arg(long, env = "FACE_ESPEAK", default_value = "espeak-ng")]
    pub espeak_program: String,

    /// Mouth timing profile
    #[arg(long, env = "FACE_PROFILE", value_enum, default_value = "syllable")]
    pub profile: ProfileKind,

    /// Speaking rate
    #[arg(long, env = "FACE_RATE", default_value_t = 0.8)]
    pub rate: f64,

    /// Voice pitch
    #[arg(long, env = "FACE_PITCH", default_value_t = 0.5)]
    pub pitch: f64,

    /// Voice volume
    #[arg(long, env = "FACE_VOLUME", default_value_t = 0.8)]
    pub volume: f64,
}

impl Config {
    pub fn chat(&self) -> ChatConfig {
        ChatConfig::new(&self.api_url, &self.api_key)
            .with_model(&self.model)
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }

    pub fn voice(&self) -> VoiceSettings {
        VoiceSettings {
            rate: prosody::normalize_rate(self.rate),
            pitch: self.pitch.clamp(0.0, 2.0),
            volume: self.volume.clamp(0.0, 1.0),
        }
    }

    pub fn speech_engine(&self, profile: Profile) -> Arc<dyn SpeechEngine> {
        match self.engine {
            EngineKind::Simulated => Arc::new(SimulatedEngine::new(profile.analyzer())),
            EngineKind::Espeak => Arc::new(CommandEngine::new(&self.espeak_program)),
        }
    }

    /// Wire up a [`Robot`] from these settings.
    pub fn build_robot(&self) -> anyhow::Result<Robot> {
        let profile = Profile::from(self.profile);
        let mouth = Arc::new(TtsMouth::with_profile(
            self.speech_engine(profile),
            profile,
            self.voice(),
        ));
        let driver = mouth.driver().clone();
        let llm = Arc::new(OpenAIClient::new(self.chat())?);
        Ok(Robot::new(mouth, driver, llm))
    }
}
