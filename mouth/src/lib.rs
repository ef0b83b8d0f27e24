//! Mouth animation for the robot face.
//!
//! [`MouthDriver`] walks a sequence of [`prosody::WordTiming`]s on a timer and
//! publishes [`MouthState`] snapshots describing how wide the mouth is open.
//! [`Mouth`] is the interface speech front ends implement on top of it.

pub mod driver;
pub mod profile;
pub mod state;
pub mod traits;

pub use driver::{Granularity, MouthDriver};
pub use profile::Profile;
pub use state::MouthState;
pub use traits::Mouth;
