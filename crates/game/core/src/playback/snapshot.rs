use std::collections::BTreeMap;

use super::script::PlaybackScript;
use super::state::PlaybackState;
use super::timer::{TimerId, TimerPurpose};
use super::view::{MicrogameResult, PlaybackView};
use crate::definition::{EventId, InstanceId, MicrogameId};
use crate::ledger::Points;
use crate::session::ItemResult;

/// Read-only copy of a session for observers and UIs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackSnapshot {
    pub view: PlaybackView,
    pub flow_index: usize,
    pub flow_len: usize,
    pub microgame_id: Option<MicrogameId>,
    pub overlay_visible: bool,
    pub awaiting_interaction: bool,
    pub play_id: u64,
    pub last_result: Option<MicrogameResult>,
    pub total_score: Points,
    pub completed: Vec<InstanceId>,
    pub event_counts: BTreeMap<EventId, u32>,
    pub results: Vec<ItemResult>,
    pub pending_timer: Option<(TimerId, TimerPurpose)>,
    pub closed: bool,
}

impl PlaybackSnapshot {
    pub fn capture(state: &PlaybackState, script: &PlaybackScript) -> Self {
        let session = state.session();
        let microgame_id = state
            .view()
            .is_item_view()
            .then(|| script.item(state.flow_index()))
            .flatten()
            .map(|item| item.microgame_id().clone());

        Self {
            view: state.view(),
            flow_index: state.flow_index(),
            flow_len: script.items.len(),
            microgame_id,
            overlay_visible: state.is_overlay_visible(),
            awaiting_interaction: state.is_awaiting_interaction(),
            play_id: state.play_id(),
            last_result: state.last_result(),
            total_score: session.total_score(),
            completed: session.completed().iter().cloned().collect(),
            event_counts: session.event_counts().clone(),
            results: session.results().to_vec(),
            pending_timer: state.pending_timer().map(|timer| (timer.id, timer.purpose)),
            closed: state.is_closed(),
        }
    }
}
