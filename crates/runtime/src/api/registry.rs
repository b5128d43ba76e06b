//! Module registry keyed by microgame id.
//!
//! # Design
//!
//! - **Factories**: a fresh module is created for every mount
//! - **Bindings**: each microgame id maps to one factory
//! - **Fallback chain**: microgame binding → fallback factory → not registered

use std::collections::HashMap;
use std::sync::Arc;

use macrogame_core::MicrogameId;

use super::modules::MinigameModule;

/// Creates module instances for a microgame.
pub trait ModuleFactory: Send + Sync {
    fn create(&self, microgame: &MicrogameId) -> Box<dyn MinigameModule>;
}

impl<F> ModuleFactory for F
where
    F: Fn(&MicrogameId) -> Box<dyn MinigameModule> + Send + Sync,
{
    fn create(&self, microgame: &MicrogameId) -> Box<dyn MinigameModule> {
        self(microgame)
    }
}

#[derive(Clone, Default)]
pub struct ModuleRegistry {
    factories: HashMap<MicrogameId, Arc<dyn ModuleFactory>>,
    fallback: Option<Arc<dyn ModuleFactory>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a microgame, replacing any previous one.
    pub fn register(&mut self, microgame: impl Into<MicrogameId>, factory: impl ModuleFactory + 'static) {
        self.factories.insert(microgame.into(), Arc::new(factory));
    }

    pub fn with(mut self, microgame: impl Into<MicrogameId>, factory: impl ModuleFactory + 'static) -> Self {
        self.register(microgame, factory);
        self
    }

    /// Factory used for microgames without their own binding.
    pub fn set_fallback(&mut self, factory: impl ModuleFactory + 'static) {
        self.fallback = Some(Arc::new(factory));
    }

    pub fn with_fallback(mut self, factory: impl ModuleFactory + 'static) -> Self {
        self.set_fallback(factory);
        self
    }

    /// Create a module for `microgame`, or `None` if nothing can play it.
    pub fn create(&self, microgame: &MicrogameId) -> Option<Box<dyn MinigameModule>> {
        self.factories
            .get(microgame)
            .or(self.fallback.as_ref())
            .map(|factory| factory.create(microgame))
    }
}
