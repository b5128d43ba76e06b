use std::collections::BTreeMap;

use super::ids::{EventId, MicrogameId, VariantId};
use crate::ledger::Points;

/// Catalog record for a base microgame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MicrogameMetadata {
    pub id: MicrogameId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Controls blurb shown on the controls / combined screen.
    #[cfg_attr(feature = "serde", serde(default))]
    pub controls: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trackable_events: Vec<TrackableEvent>,
    /// Opaque per-game data handed to the module.
    #[cfg_attr(feature = "serde", serde(default))]
    pub game_data: BTreeMap<String, String>,
}

impl MicrogameMetadata {
    pub fn new(id: impl Into<MicrogameId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            controls: String::new(),
            trackable_events: Vec::new(),
            game_data: BTreeMap::new(),
        }
    }

    pub fn with_event(mut self, event_id: impl Into<EventId>, default_points: Points) -> Self {
        self.trackable_events.push(TrackableEvent {
            event_id: event_id.into(),
            default_points,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackableEvent {
    pub event_id: EventId,
    pub default_points: Points,
}

/// Custom art and copy applied to a microgame by a variant.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkinConfig {
    pub variant_id: Option<VariantId>,
    pub values: BTreeMap<String, String>,
}

/// A flow item joined with its microgame metadata, ready for playback.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MicrogameInstance {
    /// Position of the originating item in `MacrogameDefinition::flow`.
    pub source_index: usize,
    pub metadata: MicrogameMetadata,
    pub skin: Option<SkinConfig>,
    pub point_rules: BTreeMap<EventId, Points>,
}

impl MicrogameInstance {
    pub fn microgame_id(&self) -> &MicrogameId {
        &self.metadata.id
    }

    /// Points awarded for `event_id`, or `None` when the microgame does not
    /// declare that event.
    ///
    /// Per-instance point rules override the catalog default.
    pub fn points_for(&self, event_id: &EventId) -> Option<Points> {
        let event = self
            .metadata
            .trackable_events
            .iter()
            .find(|event| &event.event_id == event_id)?;

        Some(
            self.point_rules
                .get(event_id)
                .copied()
                .unwrap_or(event.default_points),
        )
    }
}
