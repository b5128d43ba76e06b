//! Session-scoped state that outlives the playback cursor.
//!
//! A [`SessionState`] is created when playback starts and dropped when the
//! user leaves. Restarting the flow keeps it; only an explicit session reset
//! clears it.

use std::collections::{BTreeMap, BTreeSet};

use crate::definition::{EventId, InstanceId, MicrogameId};
use crate::ledger::{Points, ScoreLedger};

/// Outcome of one played microgame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemResult {
    pub flow_index: usize,
    pub microgame_id: MicrogameId,
    pub win: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    pub ledger: ScoreLedger,
    completed: BTreeSet<InstanceId>,
    event_counts: BTreeMap<EventId, u32>,
    results: Vec<ItemResult>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_score(&self) -> Points {
        self.ledger.balance()
    }

    pub fn completed(&self) -> &BTreeSet<InstanceId> {
        &self.completed
    }

    pub fn is_completed(&self, instance: &InstanceId) -> bool {
        self.completed.contains(instance)
    }

    /// Adds `instance` to the completion set. Returns `false` if it was already there.
    ///
    /// There is no removal: completion is monotonic for the session.
    pub fn mark_completed(&mut self, instance: InstanceId) -> bool {
        self.completed.insert(instance)
    }

    pub fn event_counts(&self) -> &BTreeMap<EventId, u32> {
        &self.event_counts
    }

    pub(crate) fn count_event(&mut self, event_id: &EventId) {
        let count = self.event_counts.entry(event_id.clone()).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn results(&self) -> &[ItemResult] {
        &self.results
    }

    pub(crate) fn record_result(&mut self, result: ItemResult) {
        self.results.push(result);
    }

    /// Wipes score, completions, counts and results.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
