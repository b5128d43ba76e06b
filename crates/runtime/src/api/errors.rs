//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, module mounting and playback
//! triggers so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use macrogame_core::{MicrogameId, PlaybackError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("playback worker command channel closed")]
    CommandChannelClosed,

    #[error("playback worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("playback worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a playback script before building")]
    MissingScript,

    #[error("no module registered for microgame {microgame}")]
    ModuleNotRegistered { microgame: MicrogameId },

    #[error("module for microgame {microgame} failed to mount: {reason}")]
    ModuleMount {
        microgame: MicrogameId,
        reason: String,
    },

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}
