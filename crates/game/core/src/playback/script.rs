//! Hydration of an authored definition into a playable script.

use crate::definition::{ConversionScreen, MacrogameDefinition, MicrogameId, MicrogameInstance};
use crate::env::MicrogameOracle;

use super::view::PlaybackMode;

/// Why a flow item was left out of playback.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// The microgame was deleted after the macrogame was saved.
    MissingMicrogame,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedItem {
    pub source_index: usize,
    pub microgame_id: MicrogameId,
    pub reason: SkipReason,
}

/// Immutable input of a playback session: the definition, its playable
/// items and the conversion screen shown at the end.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackScript {
    pub definition: MacrogameDefinition,
    pub items: Vec<MicrogameInstance>,
    pub skipped: Vec<SkippedItem>,
    pub conversion_screen: Option<ConversionScreen>,
    pub mode: PlaybackMode,
}

impl PlaybackScript {
    /// Joins every flow item with its catalog metadata.
    ///
    /// Items whose microgame no longer exists are skipped rather than failing
    /// the session. A missing variant falls back to the base skin.
    pub fn hydrate<O>(
        definition: MacrogameDefinition,
        conversion_screen: Option<ConversionScreen>,
        microgames: &O,
    ) -> Self
    where
        O: MicrogameOracle + ?Sized,
    {
        let mut items = Vec::with_capacity(definition.flow.len());
        let mut skipped = Vec::new();

        for (source_index, item) in definition.flow.iter().enumerate() {
            let Some(metadata) = microgames.microgame(&item.microgame_id) else {
                skipped.push(SkippedItem {
                    source_index,
                    microgame_id: item.microgame_id.clone(),
                    reason: SkipReason::MissingMicrogame,
                });
                continue;
            };

            let skin = item
                .variant_id
                .as_ref()
                .and_then(|variant| microgames.variant(&item.microgame_id, variant))
                .cloned();

            items.push(MicrogameInstance {
                source_index,
                metadata: metadata.clone(),
                skin,
                point_rules: item.point_rules.clone().unwrap_or_default(),
            });
        }

        Self {
            definition,
            items,
            skipped,
            conversion_screen,
            mode: PlaybackMode::Full,
        }
    }

    /// Single-microgame preview: the end screen shows a replay control.
    pub fn with_mode(mut self, mode: PlaybackMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn item(&self, flow_index: usize) -> Option<&MicrogameInstance> {
        self.items.get(flow_index)
    }
}
