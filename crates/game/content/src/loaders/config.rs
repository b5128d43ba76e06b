//! Engine configuration loader.

use std::path::Path;

use macrogame_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct EngineConfigLoader;

impl EngineConfigLoader {
    /// Load engine config from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse engine config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = EngineConfigLoader::parse("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn result_delay_is_read() {
        let config = EngineConfigLoader::parse("result_screen_duration_ms = 1200").unwrap();
        assert_eq!(config.result_screen_duration_ms, 1_200);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = EngineConfigLoader::parse("result_screen_duration_ms = \"soon\"").unwrap_err();
        assert!(err.to_string().contains("engine config"));
    }
}
