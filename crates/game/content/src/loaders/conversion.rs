//! Conversion screen loader.
//!
//! Only the screen a macrogame actually uses is checked with
//! [`validate_screen`]: duplicate instances and gates that point forward (or
//! at themselves) fail the load, while gates naming an instance that no
//! longer exists are accepted with a warning. The resolver keeps such slots
//! locked for good.

use std::path::Path;

use anyhow::Context;
use macrogame_core::{ConversionScreen, ConversionScreenId, validate_screen};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Conversion screen file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenCatalog {
    pub screens: Vec<ConversionScreen>,
}

impl ScreenCatalog {
    pub fn find(&self, id: &ConversionScreenId) -> Option<&ConversionScreen> {
        self.screens.iter().find(|screen| &screen.id == id)
    }
}

/// Loader for conversion screens from RON files.
pub struct ConversionScreenLoader;

impl ConversionScreenLoader {
    pub fn load(path: &Path) -> LoadResult<ScreenCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ScreenCatalog> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse conversion screen RON: {}", e))
    }

    /// Checks the gate graph of `screen` and warns about stale references.
    pub fn validate(screen: &ConversionScreen) -> LoadResult<()> {
        let stale = validate_screen(screen)
            .with_context(|| format!("Invalid conversion screen {}", screen.id))?;
        for reference in stale {
            tracing::warn!(
                target: "content::conversion",
                screen = %screen.id,
                instance = %reference.instance,
                prerequisite = %reference.target,
                "gate references a missing instance; slot will stay locked"
            );
        }
        Ok(())
    }
}
