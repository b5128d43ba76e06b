//! Event types for different topics.

use macrogame_core::{
    EndScreen, EventId, InstanceId, MicrogameId, MicrogameResult, PlaybackView, Points,
};
use serde::{Deserialize, Serialize};

/// Events related to the playback cursor and mounted modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    ViewChanged {
        view: PlaybackView,
        flow_index: Option<usize>,
        microgame_id: Option<MicrogameId>,
    },
    OverlayChanged {
        visible: bool,
    },
    MicrogameStarted {
        flow_index: usize,
        microgame_id: MicrogameId,
        play_id: u64,
    },
    MicrogameEnded {
        flow_index: usize,
        microgame_id: MicrogameId,
        play_id: u64,
        result: MicrogameResult,
    },
    InteractionRegistered {
        play_id: u64,
    },
    /// No module could be mounted; the game was recorded as lost.
    ModuleUnavailable {
        microgame_id: MicrogameId,
        play_id: u64,
        reason: String,
    },
    SessionReset,
    Closed,
}

/// Ledger changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEvent {
    Credited {
        event_id: EventId,
        points: Points,
        total: Points,
    },
    Debited {
        amount: Points,
        total: Points,
    },
}

/// Conversion screen updates for the reward renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferEvent {
    /// Current end screen, published on entering `End` and after every change.
    Resolved(EndScreen),
    Completed { instance_id: InstanceId },
}
