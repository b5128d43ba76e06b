use std::collections::BTreeMap;

use super::ids::{ConversionScreenId, EventId, InstanceId, MacrogameId, MicrogameId, VariantId};
use crate::ledger::Points;

/// An authored macrogame, immutable for the duration of playback.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacrogameDefinition {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: MacrogameId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub flow: Vec<FlowItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub intro_screen: ScreenConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub promo_screen: ScreenConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: MacrogameConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conversion_screen_id: Option<ConversionScreenId>,
    /// Price list for point-gated offers, keyed by method instance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub point_costs: BTreeMap<InstanceId, Points>,
}

/// One step of the authored flow: a microgame reference plus scoring overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowItem {
    pub microgame_id: MicrogameId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variant_id: Option<VariantId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub point_rules: Option<BTreeMap<EventId, Points>>,
}

impl FlowItem {
    pub fn new(microgame_id: impl Into<MicrogameId>) -> Self {
        Self {
            microgame_id: microgame_id.into(),
            variant_id: None,
            point_rules: None,
        }
    }

    pub fn with_variant(mut self, variant_id: impl Into<VariantId>) -> Self {
        self.variant_id = Some(variant_id.into());
        self
    }

    pub fn with_point_rule(mut self, event_id: impl Into<EventId>, points: Points) -> Self {
        self.point_rules
            .get_or_insert_with(BTreeMap::new)
            .insert(event_id.into(), points);
        self
    }
}

/// Intro or promo screen shown before the first / after the last microgame.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScreenConfig {
    pub enabled: bool,
    pub text: String,
    pub duration_seconds: u32,
    pub click_to_continue: bool,
    pub background_image_url: Option<String>,
    pub spotlight: Option<Spotlight>,
}

impl ScreenConfig {
    pub fn timed(duration_seconds: u32) -> Self {
        Self {
            enabled: true,
            duration_seconds,
            ..Self::default()
        }
    }

    pub fn click_through() -> Self {
        Self {
            enabled: true,
            click_to_continue: true,
            ..Self::default()
        }
    }

    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_seconds) * 1_000
    }
}

/// Featured image on an intro/promo screen. `layout` is a render hint only.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spotlight {
    pub url: String,
    pub layout: String,
}

/// How the title and controls screens are presented before each microgame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ScreenFlowType {
    /// Title screen, then controls screen, then the game.
    #[default]
    Separate,
    /// A single screen holding both, shown for the sum of both durations.
    Combined,
    /// Straight into the game.
    Skip,
    /// Title/controls drawn over the running game for the combined duration.
    Overlay,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MacrogameConfig {
    pub title_screen_duration_ms: u64,
    pub controls_screen_duration_ms: u64,
    pub screen_flow_type: ScreenFlowType,
    pub background_music_url: Option<String>,
}

impl MacrogameConfig {
    pub const DEFAULT_TITLE_SCREEN_DURATION_MS: u64 = 2_000;
    pub const DEFAULT_CONTROLS_SCREEN_DURATION_MS: u64 = 3_000;

    /// Time spent on static pre-screens (or the overlay) before each game.
    pub fn pre_game_duration_ms(&self) -> u64 {
        self.title_screen_duration_ms
            .saturating_add(self.controls_screen_duration_ms)
    }
}

impl Default for MacrogameConfig {
    fn default() -> Self {
        Self {
            title_screen_duration_ms: Self::DEFAULT_TITLE_SCREEN_DURATION_MS,
            controls_screen_duration_ms: Self::DEFAULT_CONTROLS_SCREEN_DURATION_MS,
            screen_flow_type: ScreenFlowType::default(),
            background_music_url: None,
        }
    }
}
