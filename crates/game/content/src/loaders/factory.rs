//! Content factory for building a playable bundle from a content directory.

use std::path::{Path, PathBuf};

use macrogame_core::{
    ConversionScreen, EngineConfig, MacrogameDefinition, MethodTable, MicrogameTable,
    PlaybackMode, PlaybackScript,
};

use crate::loaders::{
    ConversionScreenLoader, EngineConfigLoader, LoadResult, MacrogameLoader, MethodLoader,
    MicrogameLoader,
};

/// Everything a playback session needs, loaded and validated.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub definition: MacrogameDefinition,
    pub conversion_screen: Option<ConversionScreen>,
    pub microgames: MicrogameTable,
    pub methods: MethodTable,
    pub engine: EngineConfig,
}

impl ContentBundle {
    /// Hydrates the definition against the microgame catalog.
    pub fn script(&self, mode: PlaybackMode) -> PlaybackScript {
        let script = PlaybackScript::hydrate(
            self.definition.clone(),
            self.conversion_screen.clone(),
            &self.microgames,
        )
        .with_mode(mode);

        for skipped in &script.skipped {
            tracing::warn!(
                target: "content::factory",
                macrogame = %self.definition.id,
                index = skipped.source_index,
                microgame = %skipped.microgame_id,
                "flow item skipped: microgame not in catalog"
            );
        }
        script
    }
}

/// Content factory that loads all macrogame content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// content_dir/
/// ├── engine.toml      (optional)
/// ├── macrogame.ron
/// ├── screens.ron      (optional)
/// ├── microgames.ron
/// └── methods.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `engine.toml`, or defaults if absent.
    pub fn load_engine_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("engine.toml");
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        EngineConfigLoader::load(&path)
    }

    pub fn load_definition(&self) -> LoadResult<MacrogameDefinition> {
        MacrogameLoader::load(&self.data_dir.join("macrogame.ron"))
    }

    pub fn load_microgames(&self) -> LoadResult<MicrogameTable> {
        MicrogameLoader::load(&self.data_dir.join("microgames.ron"))
    }

    pub fn load_methods(&self) -> LoadResult<MethodTable> {
        MethodLoader::load(&self.data_dir.join("methods.ron"))
    }

    /// Load the conversion screen the definition points at.
    ///
    /// A definition without a screen id, or an id missing from `screens.ron`,
    /// yields `None`; playback then ends on the neutral fallback.
    pub fn load_conversion_screen(
        &self,
        definition: &MacrogameDefinition,
    ) -> LoadResult<Option<ConversionScreen>> {
        let Some(screen_id) = &definition.conversion_screen_id else {
            return Ok(None);
        };

        let path = self.data_dir.join("screens.ron");
        if !path.exists() {
            tracing::warn!(
                target: "content::factory",
                screen = %screen_id,
                "screens.ron not found; no conversion screen"
            );
            return Ok(None);
        }

        let catalog = ConversionScreenLoader::load(&path)?;
        let Some(screen) = catalog.find(screen_id) else {
            tracing::warn!(
                target: "content::factory",
                screen = %screen_id,
                "conversion screen not found; no conversion screen"
            );
            return Ok(None);
        };
        ConversionScreenLoader::validate(screen)?;
        Ok(Some(screen.clone()))
    }

    /// Load and cross-check every file of the directory.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let definition = self.load_definition()?;
        let conversion_screen = self.load_conversion_screen(&definition)?;
        let bundle = ContentBundle {
            conversion_screen,
            microgames: self.load_microgames()?,
            methods: self.load_methods()?,
            engine: self.load_engine_config()?,
            definition,
        };

        tracing::info!(
            target: "content::factory",
            macrogame = %bundle.definition.id,
            flow = bundle.definition.flow.len(),
            microgames = bundle.microgames.len(),
            methods = bundle.methods.len(),
            has_screen = bundle.conversion_screen.is_some(),
            "content loaded"
        );
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
