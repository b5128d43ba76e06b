/// Engine-level tunables that are not part of an authored macrogame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// How long the win/lose banner stays up after a microgame ends.
    pub result_screen_duration_ms: u64,
}

impl EngineConfig {
    pub const DEFAULT_RESULT_SCREEN_DURATION_MS: u64 = 2_500;

    pub fn new() -> Self {
        Self {
            result_screen_duration_ms: Self::DEFAULT_RESULT_SCREEN_DURATION_MS,
        }
    }

    pub fn with_result_screen_duration_ms(mut self, result_screen_duration_ms: u64) -> Self {
        self.result_screen_duration_ms = result_screen_duration_ms;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
