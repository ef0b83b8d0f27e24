//! A talking robot face.
//!
//! [`Robot`] ties a [`tts::TtsMouth`] to an [`llm::LLMClient`]: typed text is
//! either spoken directly or sent to the language model and the reply spoken.
//! [`web::app`] serves the face and its controls in the browser.

pub mod config;
pub mod geometry;
pub mod logging;
pub mod robot;
pub mod web;

pub use config::{Config, EngineKind, ProfileKind};
pub use logging::init_logging;
pub use robot::{APOLOGY, Mode, Robot};
pub use web::{AppState, StatusReport, app};
