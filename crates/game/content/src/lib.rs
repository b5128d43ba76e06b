//! Data-driven macrogame content and loaders.
//!
//! This crate reads authored data from RON/TOML files:
//! - Macrogame definitions (flow, intro/promo screens, pre-game timings)
//! - Conversion screens (method instances and their gates)
//! - Microgame catalog (metadata, trackable events, variant skins)
//! - Conversion method catalog
//! - Engine configuration (TOML)
//!
//! Loaded catalogs implement the `macrogame-core` oracle traits and never
//! appear in session state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ContentBundle, ContentFactory, ConversionScreenLoader, EngineConfigLoader, MacrogameLoader,
    MethodLoader, MicrogameLoader,
};
