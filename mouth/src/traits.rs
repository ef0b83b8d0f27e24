use async_trait::async_trait;

/// Something that can say things out loud while moving the face.
///
/// Implementations must be `Send` and `Sync` so they can be shared across
/// tasks.
#[async_trait]
pub trait Mouth: Send + Sync {
    /// Start vocalizing `text`, replacing anything currently being said.
    ///
    /// Blank text is ignored. The returned future resolves once the
    /// utterance has been handed to the speech engine, not when it finishes.
    async fn speak(&self, text: &str);
    /// Interrupt any in-progress speech and close the mouth.
    async fn interrupt(&self);
    /// Return `true` while the mouth is animating.
    fn speaking(&self) -> bool;
}
