use super::timer::TimerId;
use super::view::{MicrogameResult, PlaybackView};
use crate::definition::{EventId, InstanceId, MicrogameId};
use crate::ledger::Points;

/// Observable consequence of a trigger, in the order it happened.
///
/// The host applies timer effects (arming or cancelling a real timer) and
/// forwards the rest to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackEffect {
    ViewEntered {
        view: PlaybackView,
        /// Set for item views (title, controls, combined, game, result).
        flow_index: Option<usize>,
    },
    TimerScheduled {
        id: TimerId,
        delay_ms: u64,
    },
    TimerCancelled {
        id: TimerId,
    },
    OverlayChanged {
        visible: bool,
    },
    /// A module should be mounted for this item. `play_id` identifies the
    /// mount; callbacks carrying an older id are ignored.
    MicrogameLaunched {
        flow_index: usize,
        microgame_id: MicrogameId,
        play_id: u64,
    },
    MicrogameFinished {
        flow_index: usize,
        microgame_id: MicrogameId,
        play_id: u64,
        result: MicrogameResult,
    },
    /// The "waiting for input" overlay can go away.
    InteractionRegistered {
        play_id: u64,
    },
    PointsCredited {
        event_id: EventId,
        points: Points,
        total: Points,
    },
    PointsDebited {
        amount: Points,
        total: Points,
    },
    OfferCompleted {
        instance_id: InstanceId,
    },
    SessionReset,
    Closed,
}
