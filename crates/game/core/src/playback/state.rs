use super::timer::{PendingTimer, TimerSlot};
use super::view::{MicrogameResult, PlaybackView};
use crate::session::SessionState;

/// Mutable state of one playback session: the flow cursor plus the
/// session-scoped score and completions.
///
/// Only [`PlaybackEngine`](super::PlaybackEngine) mutates it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackState {
    pub(crate) session: SessionState,
    pub(crate) view: PlaybackView,
    pub(crate) flow_index: usize,
    pub(crate) overlay_visible: bool,
    pub(crate) awaiting_interaction: bool,
    pub(crate) last_result: Option<MicrogameResult>,
    pub(crate) play_id: u64,
    pub(crate) timers: TimerSlot,
    pub(crate) closed: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::with_session(SessionState::new())
    }

    /// Starts a cursor on top of an existing session.
    pub fn with_session(session: SessionState) -> Self {
        Self {
            session,
            view: PlaybackView::Idle,
            flow_index: 0,
            overlay_visible: false,
            awaiting_interaction: false,
            last_result: None,
            play_id: 0,
            timers: TimerSlot::default(),
            closed: false,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn view(&self) -> PlaybackView {
        self.view
    }

    pub fn flow_index(&self) -> usize {
        self.flow_index
    }

    pub fn is_overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn is_awaiting_interaction(&self) -> bool {
        self.awaiting_interaction
    }

    pub fn last_result(&self) -> Option<MicrogameResult> {
        self.last_result
    }

    /// Mount id of the current (or most recent) game.
    pub fn play_id(&self) -> u64 {
        self.play_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn pending_timer(&self) -> Option<PendingTimer> {
        self.timers.pending()
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}
