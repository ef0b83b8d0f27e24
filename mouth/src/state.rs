use serde::{Deserialize, Serialize};

/// Snapshot of the animated mouth.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouthState {
    pub is_animating: bool,
    /// Opening in `[0, 1]`; only meaningful while animating.
    pub intensity: f32,
    /// Word currently being spoken, empty when idle.
    pub current_word: String,
    /// 1-based syllable driving the mouth, 0 when idle or stepping per word.
    pub current_syllable: u32,
}

impl MouthState {
    /// The closed, silent mouth.
    pub fn idle() -> Self {
        Self::default()
    }
}
