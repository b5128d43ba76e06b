//! Builds the runtime and content bundle used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use macrogame_content::ContentBundle;
use macrogame_core::{MicrogameInstance, PlaybackMode, PlaybackScript};
use runtime::{ModuleRegistry, Runtime, RuntimeConfig};

use crate::config::PreviewConfig;
use crate::source::{ContentSource, DirectoryContentSource};

/// Builder that assembles content, modules, and configuration for clients.
pub struct RuntimeBuilder {
    config: PreviewConfig,
    source: Arc<dyn ContentSource>,
    modules: ModuleRegistry,
}

impl RuntimeBuilder {
    pub fn new(config: PreviewConfig) -> Self {
        let source = DirectoryContentSource::from_config(&config);
        Self {
            config,
            source: Arc::new(source),
            modules: ModuleRegistry::new(),
        }
    }

    /// Provide a custom content source (e.g., an in-memory bundle for tests).
    pub fn content_source(mut self, source: impl ContentSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    pub fn modules(mut self, modules: ModuleRegistry) -> Self {
        self.modules = modules;
        self
    }

    pub async fn build(self) -> Result<RuntimeSetup> {
        let bundle = self.source.load()?;
        let script = preview_script(&bundle, &self.config)?;

        tracing::info!(
            target: "bootstrap::builder",
            macrogame = %bundle.definition.id,
            mode = ?self.config.mode,
            items = script.items.len(),
            session = self.config.session_id.as_deref().unwrap_or("-"),
            "assembling runtime"
        );

        let runtime_config = RuntimeConfig {
            engine: bundle.engine.clone(),
            event_buffer_size: self.config.channels.event_buffer,
            command_buffer_size: self.config.channels.command_buffer,
        };

        let runtime = Runtime::builder()
            .config(runtime_config)
            .script(script)
            .methods(bundle.methods.clone())
            .modules(self.modules)
            .build()
            .await?;

        Ok(RuntimeSetup {
            config: self.config,
            bundle,
            runtime,
        })
    }
}

pub struct RuntimeSetup {
    pub config: PreviewConfig,
    pub bundle: ContentBundle,
    pub runtime: Runtime,
}

/// Hydrates the bundle for the configured mode.
///
/// Microgame preview narrows the flow to one item: the configured microgame,
/// or the first playable item when none is set.
fn preview_script(bundle: &ContentBundle, config: &PreviewConfig) -> Result<PlaybackScript> {
    let mut script = bundle.script(config.mode);
    if config.mode == PlaybackMode::Full {
        return Ok(script);
    }

    let chosen: Option<MicrogameInstance> = match &config.preview_microgame {
        Some(id) => script
            .items
            .iter()
            .find(|item| item.microgame_id() == id)
            .cloned(),
        None => script.items.first().cloned(),
    };
    let item = chosen.with_context(|| match &config.preview_microgame {
        Some(id) => format!("Microgame {id} is not playable in {}", bundle.definition.id),
        None => format!("Macrogame {} has no playable microgame", bundle.definition.id),
    })?;

    script.items = vec![item];
    Ok(script)
}
