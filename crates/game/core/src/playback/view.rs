/// Screen the playback cursor is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackView {
    /// Not started yet.
    Idle,
    Intro,
    Title,
    Controls,
    /// Title and controls merged into one screen.
    Combined,
    Game,
    Result,
    Promo,
    End,
}

impl PlaybackView {
    /// Views that belong to a specific flow item.
    pub const fn is_item_view(self) -> bool {
        matches!(
            self,
            Self::Title | Self::Controls | Self::Combined | Self::Game | Self::Result
        )
    }

    /// Views the user can leave with a click.
    pub const fn accepts_click(self) -> bool {
        matches!(self, Self::Intro | Self::Promo)
    }
}

/// Whether playback covers a whole macrogame or previews one microgame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackMode {
    #[default]
    Full,
    /// The end screen offers a replay control instead of the conversion screen.
    MicrogamePreview,
}

/// Reported by a minigame module when it ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MicrogameResult {
    pub win: bool,
}

impl MicrogameResult {
    pub const WIN: Self = Self { win: true };
    pub const LOSE: Self = Self { win: false };
}

/// What a restart clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RestartScope {
    /// Rewind the flow cursor only; score and completions carry over.
    #[default]
    Flow,
    /// Also clear score, completions and counters (fresh session).
    Session,
}
