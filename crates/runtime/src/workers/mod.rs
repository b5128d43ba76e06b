//! Worker tasks that back the runtime orchestration.
//!
//! The playback worker owns the session and is the only task that touches
//! [`macrogame_core::PlaybackState`].

mod playback;

pub use playback::{Command, PlaybackWorker};
