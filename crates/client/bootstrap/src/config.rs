//! Preview configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use macrogame_core::{MicrogameId, PlaybackMode};

/// Configuration required to bootstrap a preview session.
#[derive(Clone, Debug, Default)]
pub struct PreviewConfig {
    pub channels: ChannelConfig,
    pub mode: PlaybackMode,
    /// Microgame to preview in [`PlaybackMode::MicrogamePreview`]; the first
    /// flow item when unset.
    pub preview_microgame: Option<MicrogameId>,
    pub session_id: Option<String>,
    pub content_dir: Option<PathBuf>,
}

impl PreviewConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MACROGAME_CONTENT_DIR` - Content directory (default: bundled sample)
    /// - `MACROGAME_SESSION_ID` - Session identifier for log files (default: auto-generated)
    /// - `MACROGAME_MODE` - `full` or `microgame_preview` (default: full)
    /// - `MACROGAME_PREVIEW_MICROGAME` - Microgame played in preview mode
    /// - `MACROGAME_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `MACROGAME_COMMAND_BUFFER` - Worker command queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("MACROGAME_EVENT_BUFFER") {
            config.channels.event_buffer = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("MACROGAME_COMMAND_BUFFER") {
            config.channels.command_buffer = capacity.max(1);
        }

        if let Ok(raw) = env::var("MACROGAME_MODE") {
            match parse_mode(&raw) {
                Some(mode) => config.mode = mode,
                None => tracing::warn!(
                    target: "bootstrap::config",
                    value = %raw,
                    "unknown MACROGAME_MODE; using full playback"
                ),
            }
        }

        config.preview_microgame = env::var("MACROGAME_PREVIEW_MICROGAME")
            .ok()
            .map(MicrogameId::from);
        config.session_id = env::var("MACROGAME_SESSION_ID").ok();
        config.content_dir = env::var("MACROGAME_CONTENT_DIR").ok().map(PathBuf::from);

        config
    }
}

#[derive(Clone, Debug)]
pub struct ChannelConfig {
    pub event_buffer: usize,
    pub command_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            event_buffer: 100,
            command_buffer: 32,
        }
    }
}

fn parse_mode(raw: &str) -> Option<PlaybackMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "full" => Some(PlaybackMode::Full),
        "microgame_preview" | "preview" => Some(PlaybackMode::MicrogamePreview),
        _ => None,
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
